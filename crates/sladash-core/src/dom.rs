#![forbid(unsafe_code)]

//! The document seam every controller is written against.
//!
//! The browser implementation lives in `sladash-web`; tests use
//! [`MemoryDocument`](crate::memory_dom::MemoryDocument). Methods take `&self`
//! because DOM mutation in the host is interior (a live `web_sys::Document`
//! handle is shared, not owned).
//!
//! Selector arguments are CSS selector strings. An invalid selector behaves
//! like a selector that matches nothing.

use std::fmt;

/// Class toggled on the sidebar when collapsed on desktop.
pub const CLASS_COLLAPSED: &str = "collapsed";
/// Class toggled on the sidebar when hidden on mobile.
pub const CLASS_HIDDEN: &str = "hidden";
/// Class marking the selected role tab.
pub const CLASS_ACTIVE: &str = "active";
/// Class marking the open profile menu.
pub const CLASS_OPEN: &str = "open";

/// Minimal DOM surface needed by the dashboard controllers.
pub trait Document {
    /// Opaque element handle. Equality is node identity.
    type Element: Clone + PartialEq + fmt::Debug;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// First element in document order matching `selector`.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    /// Every element in document order matching `selector`.
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element>;

    /// Descendants of `root` (excluding `root`) matching `selector`.
    fn query_within(&self, root: &Self::Element, selector: &str) -> Vec<Self::Element>;

    /// Inclusive containment: an element contains itself.
    fn contains(&self, ancestor: &Self::Element, node: &Self::Element) -> bool;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    /// Add (`enabled`) or remove a class. Idempotent.
    fn set_class(&self, element: &Self::Element, class: &str, enabled: bool);

    /// Rendered text of the element and its descendants.
    fn text(&self, element: &Self::Element) -> String;

    fn set_text(&self, element: &Self::Element, text: &str);

    /// Current value of a form control; empty for anything else.
    fn value(&self, element: &Self::Element) -> String;

    fn set_value(&self, element: &Self::Element, value: &str);

    /// Show (`display` reset) or hide (`display: none`) an element.
    fn set_visible(&self, element: &Self::Element, visible: bool);

    /// Smoothly scroll `element` to the start of the viewport.
    fn scroll_into_view(&self, element: &Self::Element);

    /// First descendant of `root` matching `selector`.
    fn first_within(&self, root: &Self::Element, selector: &str) -> Option<Self::Element> {
        self.query_within(root, selector).into_iter().next()
    }

    /// Whether an optional event target lies inside `ancestor`.
    fn target_within(&self, ancestor: &Self::Element, target: Option<&Self::Element>) -> bool {
        target.is_some_and(|node| self.contains(ancestor, node))
    }
}
