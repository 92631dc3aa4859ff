#![forbid(unsafe_code)]

//! Composition root: binds every controller and routes host events.
//!
//! ```text
//! host (browser glue / test)
//!   │  UiEvent + now                      tick(now) at resize_deadline()
//!   ▼
//! Engine::dispatch ──► AnchorScroller   (click, may cancel navigation)
//!                  ──► SidebarController (click on toggle, debounced resize;
//!                                         a click flushes a pending resize)
//!                  ──► RoleSelector      (click on tab)
//!                  ──► ProfileMenu       (every click, Escape)
//!                  ──► TableFilter[]     (input, Escape in the input)
//! ```
//!
//! The KPI aggregator runs once at bind time. The metrics panel is bound
//! here but driven by the host, which owns the async executor.

use std::time::Duration;

use crate::anchor_scroll::AnchorScroller;
use crate::config::EngineConfig;
use crate::dom::Document;
use crate::event::{Dispatch, UiEvent};
use crate::kpi::{KpiAggregator, KpiSnapshot};
use crate::metrics::MetricsPanel;
use crate::profile_menu::ProfileMenu;
use crate::resize_debounce::{ResizeAction, ResizeDebouncer};
use crate::role_selector::RoleSelector;
use crate::sidebar::SidebarController;
use crate::storage::{KeyValueStorage, PreferenceStore};
use crate::table_filter::TableFilter;

/// Every dashboard controller bound against one document.
///
/// Absent controllers (`None` / empty) are inert.
#[derive(Debug)]
pub struct Engine<D: Document, S> {
    config: EngineConfig,
    sidebar: Option<SidebarController<D::Element, S>>,
    roles: Option<RoleSelector<D::Element>>,
    profile: Option<ProfileMenu<D::Element>>,
    filters: Vec<TableFilter<D::Element>>,
    kpi: Option<KpiSnapshot>,
    metrics: Option<MetricsPanel<D::Element>>,
    scroller: Option<AnchorScroller<D::Element>>,
    resize: ResizeDebouncer,
}

impl<D, S> Engine<D, S>
where
    D: Document,
    S: KeyValueStorage,
{
    /// Scan `doc` for every controller's anchors and apply initial state.
    pub fn bind(doc: &D, storage: S, config: EngineConfig, viewport_width: u32) -> Self {
        let anchors = &config.anchors;
        let sidebar = SidebarController::bind(
            doc,
            anchors,
            PreferenceStore::new(storage),
            &config.preference_key,
            config.breakpoint,
            viewport_width,
        );
        let roles = RoleSelector::bind(doc, anchors);
        let profile = ProfileMenu::bind(doc, anchors);
        let filters = TableFilter::bind_all(doc, anchors);
        let kpi = KpiAggregator::bind(doc, anchors).map(|agg| agg.refresh(doc));
        let metrics = MetricsPanel::bind(doc, &config);
        let scroller = AnchorScroller::bind(doc, anchors);

        tracing::info!(
            sidebar = sidebar.is_some(),
            roles = roles.is_some(),
            profile = profile.is_some(),
            filters = filters.len(),
            kpi = kpi.is_some(),
            metrics = metrics.is_some(),
            scroller = scroller.is_some(),
            "dashboard engine bound"
        );

        let resize = ResizeDebouncer::new(config.resize_debounce());
        Self {
            config,
            sidebar,
            roles,
            profile,
            filters,
            kpi,
            metrics,
            scroller,
            resize,
        }
    }

    /// Route one host event observed at monotonic time `now`.
    pub fn dispatch(&mut self, doc: &D, event: UiEvent<D::Element>, now: Duration) -> Dispatch {
        let mut out = Dispatch::default();
        match event {
            UiEvent::Click { target } => {
                let target = target.as_ref();
                if let Some(scroller) = &self.scroller {
                    out.prevent_default |= scroller.handle_click(doc, target);
                }
                // A toggle must act on the viewport the user is looking at.
                let pending = self.resize.flush();
                self.apply_resize(doc, pending);
                if let Some(sidebar) = &mut self.sidebar {
                    sidebar.handle_click(doc, target);
                }
                if let Some(roles) = &mut self.roles {
                    roles.handle_click(doc, target);
                }
                if let Some(profile) = &mut self.profile {
                    profile.handle_click(doc, target);
                }
            }
            UiEvent::Input { target } => {
                let target = target.as_ref();
                for filter in &self.filters {
                    if filter.handle_input(doc, target) {
                        break;
                    }
                }
            }
            UiEvent::KeyDown { target, key } => {
                let target = target.as_ref();
                for filter in &self.filters {
                    if filter.handle_key(doc, target, &key) {
                        break;
                    }
                }
                if let Some(profile) = &mut self.profile {
                    profile.handle_key(doc, &key);
                }
            }
            UiEvent::Resize { width } => {
                let action = self.resize.handle_resize(width, now);
                self.apply_resize(doc, action);
            }
        }
        out
    }

    /// Flush a debounced resize whose deadline has passed.
    pub fn tick(&mut self, doc: &D, now: Duration) {
        let action = self.resize.tick(now);
        self.apply_resize(doc, action);
    }

    /// When the host should call [`tick`](Self::tick) next, if at all.
    #[must_use]
    pub fn resize_deadline(&self) -> Option<Duration> {
        self.resize.deadline()
    }

    fn apply_resize(&mut self, doc: &D, action: ResizeAction) {
        if let (ResizeAction::Apply { width }, Some(sidebar)) = (action, &mut self.sidebar) {
            sidebar.handle_resize(doc, width);
        }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sidebar(&self) -> Option<&SidebarController<D::Element, S>> {
        self.sidebar.as_ref()
    }

    pub fn role_selector(&self) -> Option<&RoleSelector<D::Element>> {
        self.roles.as_ref()
    }

    pub fn profile_menu(&self) -> Option<&ProfileMenu<D::Element>> {
        self.profile.as_ref()
    }

    pub fn filters(&self) -> &[TableFilter<D::Element>] {
        &self.filters
    }

    /// Counts rendered at bind time, if the KPI anchors exist.
    #[must_use]
    pub const fn kpi(&self) -> Option<KpiSnapshot> {
        self.kpi
    }

    /// The metrics panel for the host to [`load`](MetricsPanel::load).
    pub fn metrics(&self) -> Option<&MetricsPanel<D::Element>> {
        self.metrics.as_ref()
    }

    pub fn anchor_scroller(&self) -> Option<&AnchorScroller<D::Element>> {
        self.scroller.as_ref()
    }
}
