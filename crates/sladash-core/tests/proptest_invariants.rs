//! Property-based invariant tests for the dashboard controllers.
//!
//! Verifies:
//! 1. Viewport: `classify(w)` is mobile iff `w <= 980`.
//! 2. Sidebar: the visual state after restore is fully determined by
//!    viewport x preference, and never carries both fold classes.
//! 3. Sidebar: any number of breakpoint crossings never leaks the other
//!    dimension's class.
//! 4. Sidebar: two toggles are an identity on state and storage.
//! 4a. Sidebar: a toggle during a pending debounced resize sets only the
//!     class of the latest width's viewport.
//! 5. Table filter: visibility equals case-insensitive substring containment.
//! 6. KPI: `resolved + active` equals the row count and `breached <= rows`.
//! 7. Resize debouncer: a burst applies exactly once with the last width.

use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;
use sladash_core::kpi::KpiSnapshot;
use sladash_core::resize_debounce::{ResizeAction, ResizeDebouncer};
use sladash_core::sidebar::SidebarVisualState;
use sladash_core::table_filter::row_matches;
use sladash_core::{
    Document, Engine, EngineConfig, MemoryDocument, MemoryStorage, NodeId, UiEvent, Viewport,
};

const PREF_KEY: &str = "sla_sidebar_collapsed";

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_width() -> impl Strategy<Value = u32> {
    prop_oneof![0u32..=4000, 975u32..=985]
}

fn arb_stored() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![Just(None), Just(Some("1")), Just(Some("0")), Just(Some("yes"))]
}

fn arb_status() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("NEW".to_string()),
        Just("IN_PROGRESS".to_string()),
        Just("resolved".to_string()),
        Just("RESOLVED".to_string()),
        Just("BREACHED".to_string()),
        Just("Breached (escalated)".to_string()),
        "[a-zA-Z ]{0,12}",
    ]
}

/// Page, sidebar, toggle button, shared storage, bound engine.
type SidebarHarness = (
    MemoryDocument,
    NodeId,
    NodeId,
    Rc<MemoryStorage>,
    Engine<MemoryDocument, Rc<MemoryStorage>>,
);

fn bind_sidebar(
    stored: Option<&str>,
    width: u32,
) -> SidebarHarness {
    bind_sidebar_with(stored, width, 0)
}

fn bind_sidebar_with(
    stored: Option<&str>,
    width: u32,
    resize_debounce_ms: u64,
) -> SidebarHarness {
    let doc = MemoryDocument::new();
    let sidebar = doc.element("aside").id("sidebar").append_to(doc.root());
    let toggle = doc.element("button").id("toggleSidebar").append_to(doc.root());
    let storage = Rc::new(match stored {
        Some(v) => MemoryStorage::with_entries([(PREF_KEY, v)]),
        None => MemoryStorage::new(),
    });
    let config = EngineConfig {
        resize_debounce_ms,
        ..EngineConfig::default()
    };
    let engine = Engine::bind(&doc, Rc::clone(&storage), config, width);
    (doc, sidebar, toggle, storage, engine)
}

proptest! {
    #[test]
    fn classify_matches_breakpoint(width in any::<u32>()) {
        prop_assert_eq!(Viewport::classify(width) == Viewport::Mobile, width <= 980);
    }

    #[test]
    fn restore_is_determined_by_viewport_and_preference(
        stored in arb_stored(),
        width in arb_width(),
    ) {
        let (doc, sidebar, _, _, engine) = bind_sidebar(stored, width);
        let folded = stored == Some("1");
        let expected = SidebarVisualState::from_flag(Viewport::classify(width), folded);
        prop_assert_eq!(engine.sidebar().unwrap().visual_state(&doc), expected);
        prop_assert!(!(doc.has_class(&sidebar, "collapsed") && doc.has_class(&sidebar, "hidden")));
    }

    #[test]
    fn breakpoint_crossings_never_leak_classes(
        stored in arb_stored(),
        start in arb_width(),
        widths in prop::collection::vec(arb_width(), 1..12),
    ) {
        let (doc, sidebar, _, _, mut engine) = bind_sidebar(stored, start);
        for width in widths {
            engine.dispatch(&doc, UiEvent::Resize { width }, Duration::ZERO);
            let viewport = Viewport::classify(width);
            let other = if viewport.is_mobile() { "collapsed" } else { "hidden" };
            prop_assert!(!doc.has_class(&sidebar, other));
            prop_assert_eq!(engine.sidebar().unwrap().viewport(), viewport);
        }
    }

    #[test]
    fn double_toggle_is_identity(stored in arb_stored(), width in arb_width()) {
        let (doc, sidebar, toggle, storage, mut engine) = bind_sidebar(stored, width);
        let classes_before = doc.classes(sidebar);
        let state_before = engine.sidebar().unwrap().visual_state(&doc);

        engine.dispatch(&doc, UiEvent::Click { target: Some(toggle) }, Duration::ZERO);
        let persisted_after_first = storage.peek(PREF_KEY);
        engine.dispatch(&doc, UiEvent::Click { target: Some(toggle) }, Duration::ZERO);

        prop_assert_eq!(doc.classes(sidebar), classes_before);
        prop_assert_eq!(engine.sidebar().unwrap().visual_state(&doc), state_before);
        let folded_before = state_before == SidebarVisualState::Collapsed
            || state_before == SidebarVisualState::Hidden;
        let persisted = storage.peek(PREF_KEY);
        prop_assert_eq!(persisted.as_deref(), Some(if folded_before { "1" } else { "0" }));
        prop_assert_ne!(persisted_after_first, storage.peek(PREF_KEY));
    }

    #[test]
    fn toggle_during_pending_resize_uses_latest_viewport(
        stored in arb_stored(),
        start in arb_width(),
        widths in prop::collection::vec(arb_width(), 1..6),
    ) {
        let (doc, sidebar, toggle, _, mut engine) = bind_sidebar_with(stored, start, 100);
        let mut now = Duration::ZERO;
        for width in &widths {
            engine.dispatch(&doc, UiEvent::Resize { width: *width }, now);
            now += Duration::from_millis(10);
        }
        engine.dispatch(&doc, UiEvent::Click { target: Some(toggle) }, now);

        let viewport = Viewport::classify(*widths.last().unwrap());
        let other = if viewport.is_mobile() { "collapsed" } else { "hidden" };
        prop_assert!(!doc.has_class(&sidebar, other));
        prop_assert_eq!(engine.sidebar().unwrap().viewport(), viewport);
        prop_assert_eq!(engine.resize_deadline(), None);
    }

    #[test]
    fn filter_visibility_is_substring_containment(
        texts in prop::collection::vec("[a-zA-Z ]{0,16}", 0..8),
        query in "[a-zA-Z]{0,3}",
    ) {
        let doc = MemoryDocument::new();
        let table = doc.element("table").id("t").append_to(doc.root());
        let body = doc.element("tbody").append_to(table);
        let rows: Vec<NodeId> = texts
            .iter()
            .map(|t| doc.element("tr").text(t).append_to(body))
            .collect();
        let input = doc
            .element("input")
            .attr("data-table-search", "#t")
            .value(&query)
            .append_to(doc.root());
        let mut engine = Engine::bind(&doc, MemoryStorage::new(), EngineConfig::default(), 1280);
        engine.dispatch(&doc, UiEvent::Input { target: Some(input) }, Duration::ZERO);

        for (row, text) in rows.iter().zip(&texts) {
            let expected = text.to_lowercase().contains(&query.to_lowercase());
            prop_assert_eq!(doc.is_visible(*row), expected);
            prop_assert_eq!(row_matches(text, &query), expected);
        }
    }

    #[test]
    fn kpi_partitions_rows(statuses in prop::collection::vec(arb_status(), 0..32)) {
        let snap = KpiSnapshot::from_statuses(&statuses);
        prop_assert_eq!(snap.resolved + snap.active, statuses.len());
        prop_assert!(snap.breached <= statuses.len());
    }

    #[test]
    fn debouncer_applies_last_width_once(
        widths in prop::collection::vec(0u32..4000, 1..20),
        gap_ms in 0u64..99,
    ) {
        let delay = Duration::from_millis(100);
        let mut d = ResizeDebouncer::new(delay);
        let mut now = Duration::ZERO;
        for w in &widths {
            prop_assert_eq!(d.handle_resize(*w, now), ResizeAction::None);
            now += Duration::from_millis(gap_ms);
        }
        let last = *widths.last().unwrap();
        prop_assert_eq!(d.tick(now + delay), ResizeAction::Apply { width: last });
        prop_assert_eq!(d.tick(now + delay * 2), ResizeAction::None);
    }
}
