#![forbid(unsafe_code)]

//! Ticket counts derived from the rendered dashboard table.
//!
//! `active` means "not resolved", so a breached ticket that is still open is
//! counted in both `active` and `breached`. The overlap is kept as-is.

use crate::config::Anchors;
use crate::dom::Document;

const RESOLVED: &str = "RESOLVED";
const BREACHED: &str = "BREACHED";

/// Counts computed from row status text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KpiSnapshot {
    pub resolved: usize,
    pub active: usize,
    pub breached: usize,
}

impl KpiSnapshot {
    /// Single pass over status strings (case-insensitive).
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        statuses
            .into_iter()
            .fold(Self::default(), |mut snap, status| {
                let status = status.as_ref().to_uppercase();
                let resolved = status.contains(RESOLVED);
                snap.resolved += usize::from(resolved);
                snap.active += usize::from(!resolved);
                snap.breached += usize::from(status.contains(BREACHED));
                snap
            })
    }
}

/// Dashboard table plus the display slots the counts are written to.
#[derive(Debug, Clone)]
pub struct KpiAggregator<E> {
    table: E,
    resolved: Option<E>,
    active: Option<E>,
    breached: Option<E>,
    status_cell_selector: String,
}

impl<E> KpiAggregator<E>
where
    E: Clone + PartialEq + std::fmt::Debug,
{
    /// Bind when the table and at least one display slot exist.
    pub fn bind<D>(doc: &D, anchors: &Anchors) -> Option<Self>
    where
        D: Document<Element = E>,
    {
        let table = doc.element_by_id(&anchors.kpi_table_id)?;
        let resolved = doc.element_by_id(&anchors.kpi_resolved_id);
        let active = doc.element_by_id(&anchors.kpi_active_id);
        let breached = doc.element_by_id(&anchors.kpi_breached_id);
        if resolved.is_none() && active.is_none() && breached.is_none() {
            return None;
        }
        Some(Self {
            table,
            resolved,
            active,
            breached,
            status_cell_selector: format!(".{}", anchors.status_cell_class),
        })
    }

    /// Count the current body rows. A row's status is its status cell when it
    /// has one, otherwise the whole row text.
    pub fn compute<D>(&self, doc: &D) -> KpiSnapshot
    where
        D: Document<Element = E>,
    {
        let statuses = doc.query_within(&self.table, "tbody tr").into_iter().map(|row| {
            let cell = doc.first_within(&row, &self.status_cell_selector);
            doc.text(cell.as_ref().unwrap_or(&row))
        });
        KpiSnapshot::from_statuses(statuses)
    }

    /// Write counts into whichever display slots exist.
    pub fn render<D>(&self, doc: &D, snapshot: &KpiSnapshot)
    where
        D: Document<Element = E>,
    {
        let slots = [
            (&self.resolved, snapshot.resolved),
            (&self.active, snapshot.active),
            (&self.breached, snapshot.breached),
        ];
        for (slot, count) in slots {
            if let Some(el) = slot {
                doc.set_text(el, &count.to_string());
            }
        }
    }

    /// Compute and render in one step.
    pub fn refresh<D>(&self, doc: &D) -> KpiSnapshot
    where
        D: Document<Element = E>,
    {
        let snapshot = self.compute(doc);
        self.render(doc, &snapshot);
        tracing::debug!(
            resolved = snapshot.resolved,
            active = snapshot.active,
            breached = snapshot.breached,
            "kpi counts rendered"
        );
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_dom::{MemoryDocument, NodeId};
    use pretty_assertions::assert_eq;

    #[test]
    fn overlapping_categories() {
        let snap = KpiSnapshot::from_statuses(["RESOLVED", "BREACHED", "NEW", "RESOLVED"]);
        assert_eq!(
            snap,
            KpiSnapshot {
                resolved: 2,
                active: 2,
                breached: 1,
            }
        );
    }

    #[test]
    fn status_matching_ignores_case() {
        let snap = KpiSnapshot::from_statuses(vec!["resolved".to_string(), "Breached".to_string()]);
        assert_eq!(snap.resolved, 1);
        assert_eq!(snap.breached, 1);
        assert_eq!(snap.active, 1);
    }

    fn dashboard(doc: &MemoryDocument, statuses: &[&str]) -> NodeId {
        let table = doc.element("table").id("dashTable").append_to(doc.root());
        let head = doc.element("thead").append_to(table);
        doc.element("tr").text("Status RESOLVED").append_to(head);
        let body = doc.element("tbody").append_to(table);
        for (i, status) in statuses.iter().enumerate() {
            let row = doc.element("tr").append_to(body);
            doc.element("td").text(&format!("Resolved-by note {i}")).append_to(row);
            doc.element("td")
                .class("ticket-status-cell")
                .text(status)
                .append_to(row);
        }
        table
    }

    #[test]
    fn status_cell_is_preferred_over_row_text() {
        let doc = MemoryDocument::new();
        dashboard(&doc, &["NEW", "IN_PROGRESS", "BREACHED"]);
        let slot = doc.element("span").id("kpiActive").text("0").append_to(doc.root());
        let agg = KpiAggregator::bind(&doc, &Anchors::default()).unwrap();

        let snap = agg.refresh(&doc);
        assert_eq!(snap.resolved, 0);
        assert_eq!(snap.active, 3);
        assert_eq!(snap.breached, 1);
        assert_eq!(doc.text(&slot), "3");
    }

    #[test]
    fn rows_without_status_cell_use_full_text() {
        let doc = MemoryDocument::new();
        let table = doc.element("table").id("dashTable").append_to(doc.root());
        let body = doc.element("tbody").append_to(table);
        doc.element("tr").text("INC-7 RESOLVED").append_to(body);
        let resolved = doc.element("b").id("kpiResolved").append_to(doc.root());
        let breached = doc.element("b").id("kpiBreached").text("-").append_to(doc.root());

        KpiAggregator::bind(&doc, &Anchors::default())
            .unwrap()
            .refresh(&doc);
        assert_eq!(doc.text(&resolved), "1");
        assert_eq!(doc.text(&breached), "0");
    }

    #[test]
    fn needs_table_and_a_slot() {
        let doc = MemoryDocument::new();
        dashboard(&doc, &["NEW"]);
        assert!(KpiAggregator::<NodeId>::bind(&doc, &Anchors::default()).is_none());

        let doc = MemoryDocument::new();
        doc.element("span").id("kpiActive").append_to(doc.root());
        assert!(KpiAggregator::<NodeId>::bind(&doc, &Anchors::default()).is_none());
    }
}
