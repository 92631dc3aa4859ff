#![forbid(unsafe_code)]

//! Core: UI state synchronization for the SLA operations dashboard.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (browser glue or a test)
//!   pushes DOM events, viewport widths and monotonic time into the [`Engine`].
//! - **Best-effort enhancement**: a missing anchor makes a controller inert,
//!   storage and network failures are swallowed. Nothing here can break the
//!   server-rendered page underneath.
//! - **Deterministic tests**: every controller runs against the [`Document`]
//!   trait, so [`MemoryDocument`] can stand in for a live browser.

pub mod anchor_scroll;
pub mod config;
pub mod dom;
pub mod engine;
pub mod event;
pub mod kpi;
pub mod memory_dom;
pub mod metrics;
pub mod profile_menu;
pub mod resize_debounce;
pub mod role_selector;
pub mod selector;
pub mod sidebar;
pub mod storage;
pub mod table_filter;
pub mod viewport;

pub use config::{Anchors, ConfigError, EngineConfig};
pub use dom::Document;
pub use engine::Engine;
pub use event::{Dispatch, Key, UiEvent};
pub use memory_dom::{MemoryDocument, NodeId};
pub use metrics::{FetchError, MetricsPanel, MetricsSummary, SummarySource};
pub use storage::{KeyValueStorage, MemoryStorage, PreferenceStore, StorageError};
pub use viewport::Viewport;
