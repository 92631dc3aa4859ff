#![forbid(unsafe_code)]

//! Collapsible navigation panel.
//!
//! The persisted flag means "collapsed" on desktop and "hidden" on mobile.
//! Only the dimension belonging to the current [`Viewport`] is ever set on the
//! element; the other class is always cleared, so a mobile `hidden` never
//! leaks into the desktop layout or vice versa.

use crate::config::Anchors;
use crate::dom::{CLASS_COLLAPSED, CLASS_HIDDEN, Document};
use crate::storage::{KeyValueStorage, PreferenceStore};
use crate::viewport::Viewport;

/// Visual state of the sidebar. Exactly one applies at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarVisualState {
    Expanded,
    Collapsed,
    Shown,
    Hidden,
}

impl SidebarVisualState {
    #[must_use]
    pub const fn from_flag(viewport: Viewport, folded: bool) -> Self {
        match (viewport, folded) {
            (Viewport::Desktop, false) => Self::Expanded,
            (Viewport::Desktop, true) => Self::Collapsed,
            (Viewport::Mobile, false) => Self::Shown,
            (Viewport::Mobile, true) => Self::Hidden,
        }
    }
}

const fn fold_class(viewport: Viewport) -> &'static str {
    match viewport {
        Viewport::Desktop => CLASS_COLLAPSED,
        Viewport::Mobile => CLASS_HIDDEN,
    }
}

/// Sidebar state machine: viewport class x persisted preference.
#[derive(Debug)]
pub struct SidebarController<E, S> {
    sidebar: E,
    toggle: Option<E>,
    prefs: PreferenceStore<S>,
    key: String,
    breakpoint: u32,
    viewport: Viewport,
}

impl<E, S> SidebarController<E, S>
where
    E: Clone + PartialEq + std::fmt::Debug,
    S: KeyValueStorage,
{
    /// Locate the sidebar and restore the persisted state for `width`.
    ///
    /// Returns `None` when the page has no sidebar. A missing toggle button
    /// still restores state and follows resizes.
    pub fn bind<D>(
        doc: &D,
        anchors: &Anchors,
        prefs: PreferenceStore<S>,
        key: &str,
        breakpoint: u32,
        width: u32,
    ) -> Option<Self>
    where
        D: Document<Element = E>,
    {
        let sidebar = doc
            .element_by_id(&anchors.sidebar_id)
            .or_else(|| doc.query_selector(&format!(".{}", anchors.sidebar_class)))?;
        let toggle = doc.element_by_id(&anchors.sidebar_toggle_id);
        let viewport = Viewport::classify_with(width, breakpoint);

        let controller = Self {
            sidebar,
            toggle,
            prefs,
            key: key.to_owned(),
            breakpoint,
            viewport,
        };
        let folded = controller.prefs.get(&controller.key);
        controller.apply(doc, folded);
        tracing::debug!(
            ?viewport,
            folded,
            has_toggle = controller.toggle.is_some(),
            "sidebar bound"
        );
        Some(controller)
    }

    /// Handle a click. Returns `true` when it activated the toggle.
    pub fn handle_click<D>(&mut self, doc: &D, target: Option<&E>) -> bool
    where
        D: Document<Element = E>,
    {
        let Some(toggle) = &self.toggle else {
            return false;
        };
        if !doc.target_within(toggle, target) {
            return false;
        }
        self.toggle(doc);
        true
    }

    /// Flip the viewport-appropriate dimension and persist the result.
    pub fn toggle<D>(&mut self, doc: &D)
    where
        D: Document<Element = E>,
    {
        let folded = !doc.has_class(&self.sidebar, fold_class(self.viewport));
        self.apply(doc, folded);
        self.prefs.set(&self.key, folded);
        tracing::trace!(viewport = ?self.viewport, folded, "sidebar toggled");
    }

    /// Re-derive state from the persisted flag when `width` crosses the
    /// breakpoint. Resizes within one viewport class leave the DOM alone.
    pub fn handle_resize<D>(&mut self, doc: &D, width: u32)
    where
        D: Document<Element = E>,
    {
        let viewport = Viewport::classify_with(width, self.breakpoint);
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        let folded = self.prefs.get(&self.key);
        self.apply(doc, folded);
        tracing::trace!(?viewport, folded, "sidebar crossed breakpoint");
    }

    /// Current visual state, read back from the element.
    pub fn visual_state<D>(&self, doc: &D) -> SidebarVisualState
    where
        D: Document<Element = E>,
    {
        let folded = doc.has_class(&self.sidebar, fold_class(self.viewport));
        SidebarVisualState::from_flag(self.viewport, folded)
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub const fn element(&self) -> &E {
        &self.sidebar
    }

    pub fn preferences(&self) -> &PreferenceStore<S> {
        &self.prefs
    }

    fn apply<D>(&self, doc: &D, folded: bool)
    where
        D: Document<Element = E>,
    {
        let (on, off) = match self.viewport {
            Viewport::Desktop => (CLASS_COLLAPSED, CLASS_HIDDEN),
            Viewport::Mobile => (CLASS_HIDDEN, CLASS_COLLAPSED),
        };
        doc.set_class(&self.sidebar, off, false);
        doc.set_class(&self.sidebar, on, folded);
    }
}
