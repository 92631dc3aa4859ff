#![forbid(unsafe_code)]

//! Live text filter over server-rendered table rows.
//!
//! A binding captures its rows once. Rows inserted after binding are not
//! tracked, which is fine for server-rendered tables.

use crate::config::Anchors;
use crate::dom::Document;
use crate::event::Key;

/// Whether a row with `text` stays visible for `query`.
///
/// Case-insensitive substring match on the trimmed query; an empty query
/// matches everything.
#[must_use]
pub fn row_matches(text: &str, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || text.to_lowercase().contains(&query)
}

/// One search input bound to the rows of one table.
#[derive(Debug, Clone)]
pub struct TableFilter<E> {
    input: E,
    rows: Vec<E>,
}

impl<E> TableFilter<E>
where
    E: Clone + PartialEq + std::fmt::Debug,
{
    /// Bind `input` to the table matched by `table_selector`, capturing the
    /// rows of its `tbody` (or of the table itself without one).
    pub fn bind<D>(doc: &D, input: E, table_selector: &str) -> Option<Self>
    where
        D: Document<Element = E>,
    {
        let table = doc.query_selector(table_selector)?;
        let body = doc.first_within(&table, "tbody").unwrap_or(table);
        let rows = doc.query_within(&body, "tr");
        tracing::debug!(table = table_selector, rows = rows.len(), "table filter bound");
        Some(Self { input, rows })
    }

    /// Every declarative binding on the page, plus the legacy fallback input
    /// when it is not already declared.
    pub fn bind_all<D>(doc: &D, anchors: &Anchors) -> Vec<Self>
    where
        D: Document<Element = E>,
    {
        let attr = &anchors.table_search_attr;
        let mut filters: Vec<Self> = doc
            .query_selector_all(&format!("[{attr}]"))
            .into_iter()
            .filter_map(|input| {
                let selector = doc.attribute(&input, attr)?;
                let bound = Self::bind(doc, input, &selector);
                if bound.is_none() {
                    tracing::debug!(selector = %selector, "search target not found");
                }
                bound
            })
            .collect();

        if let Some(fallback) = Self::bind_fallback(doc, anchors) {
            filters.push(fallback);
        }
        filters
    }

    fn bind_fallback<D>(doc: &D, anchors: &Anchors) -> Option<Self>
    where
        D: Document<Element = E>,
    {
        let input = anchors
            .fallback_search_selectors
            .iter()
            .find_map(|s| doc.query_selector(s))?;
        if doc.attribute(&input, &anchors.table_search_attr).is_some() {
            return None;
        }
        anchors
            .fallback_table_selectors
            .iter()
            .find_map(|s| Self::bind(doc, input.clone(), s))
    }

    /// Recompute visibility of every captured row. Returns the visible count.
    pub fn refilter<D>(&self, doc: &D) -> usize
    where
        D: Document<Element = E>,
    {
        let query = doc.value(&self.input);
        let mut visible = 0;
        for row in &self.rows {
            let show = row_matches(&doc.text(row), &query);
            doc.set_visible(row, show);
            visible += usize::from(show);
        }
        visible
    }

    /// Input event. Returns `true` when it targeted this binding's input.
    pub fn handle_input<D>(&self, doc: &D, target: Option<&E>) -> bool
    where
        D: Document<Element = E>,
    {
        if target != Some(&self.input) {
            return false;
        }
        self.refilter(doc);
        true
    }

    /// Escape in the input clears it, then refilters.
    pub fn handle_key<D>(&self, doc: &D, target: Option<&E>, key: &Key) -> bool
    where
        D: Document<Element = E>,
    {
        if *key != Key::Escape || target != Some(&self.input) {
            return false;
        }
        doc.set_value(&self.input, "");
        self.refilter(doc);
        true
    }

    #[must_use]
    pub const fn input(&self) -> &E {
        &self.input
    }

    #[must_use]
    pub fn rows(&self) -> &[E] {
        &self.rows
    }
}
