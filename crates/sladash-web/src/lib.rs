#![forbid(unsafe_code)]

//! WASM frontend for the SLA dashboard.
//!
//! This crate is intentionally host-specific (web/WASM). It binds the
//! `sladash-core` engine to the live page:
//! - a `web_sys::Document` behind the core `Document` seam,
//! - `window.localStorage` behind `KeyValueStorage`,
//! - `window.fetch` behind `SummarySource`,
//! - delegated `click` / `input` / `keydown` listeners plus `resize`.
//!
//! JS calls `boot()` once the DOM is ready.

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod fetch;
#[cfg(any(target_arch = "wasm32", test))]
mod registry;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{SlaDashboard, boot};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct SlaDashboard;

#[cfg(not(target_arch = "wasm32"))]
impl SlaDashboard {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }

    pub fn viewport_width(&self) -> u32 {
        0
    }

    /// Native stand-in for the wasm teardown; there is nothing to release.
    pub fn destroy(&mut self) {
        tracing::trace!("native dashboard stub destroyed");
    }
}
