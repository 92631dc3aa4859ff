#![forbid(unsafe_code)]

//! Smooth scrolling for in-page `#fragment` links on the landing page.

use crate::config::Anchors;
use crate::dom::Document;

#[derive(Debug, Clone)]
pub struct AnchorScroller<E> {
    links: Vec<E>,
}

impl<E> AnchorScroller<E>
where
    E: Clone + PartialEq + std::fmt::Debug,
{
    pub fn bind<D>(doc: &D, anchors: &Anchors) -> Option<Self>
    where
        D: Document<Element = E>,
    {
        let links = doc.query_selector_all(&anchors.anchor_link_selector);
        if links.is_empty() {
            return None;
        }
        tracing::debug!(links = links.len(), "anchor scroller bound");
        Some(Self { links })
    }

    /// Scroll to the link's target. Returns `true` when the browser's own
    /// navigation should be cancelled.
    ///
    /// A bare `#` link, or one whose target does not exist, is left alone.
    pub fn handle_click<D>(&self, doc: &D, target: Option<&E>) -> bool
    where
        D: Document<Element = E>,
    {
        let Some(link) = self.links.iter().find(|l| doc.target_within(l, target)) else {
            return false;
        };
        let Some(href) = doc.attribute(link, "href") else {
            return false;
        };
        if href.is_empty() || href == "#" {
            return false;
        }
        let Some(destination) = doc.query_selector(&href) else {
            return false;
        };
        doc.scroll_into_view(&destination);
        true
    }
}
