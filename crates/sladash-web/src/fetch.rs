#![forbid(unsafe_code)]

use sladash_core::{FetchError, SummarySource};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::storage::js_error_message;

/// Plain `GET` through `window.fetch`. The HTTP status is not inspected: an
/// error page fails to parse as a summary and is dropped the same way.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct WindowFetch;

impl SummarySource for WindowFetch {
    async fn fetch_summary(&self, endpoint: &str) -> Result<String, FetchError> {
        let window =
            web_sys::window().ok_or_else(|| FetchError::Transport("no window".to_owned()))?;
        let response = JsFuture::from(window.fetch_with_str(endpoint))
            .await
            .map_err(|e| FetchError::Transport(js_error_message(&e)))?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| FetchError::Transport("fetch did not resolve to a Response".to_owned()))?;
        let text = response
            .text()
            .map_err(|e| FetchError::Transport(js_error_message(&e)))?;
        let body = JsFuture::from(text)
            .await
            .map_err(|e| FetchError::Transport(js_error_message(&e)))?;
        body.as_string()
            .ok_or_else(|| FetchError::Decode("response body is not text".to_owned()))
    }
}
