//! DOM access for components and the router
//!
//! The runtime only needs a small slice of the DOM: markup replacement,
//! selector queries, attribute/class/style writes and event listeners whose
//! lifetime is tied to an [`AbortSignal`]. In the browser these wrap
//! `web_sys` directly. Native builds get an in-memory tree parsed with
//! `scraper`, which is what the test suite mounts components into.

use thiserror::Error;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::{AbortController, AbortSignal, Element, Event, EventListener, document_query};

#[cfg(not(target_arch = "wasm32"))]
mod memory;
#[cfg(not(target_arch = "wasm32"))]
mod selector;
#[cfg(not(target_arch = "wasm32"))]
pub use memory::{
	AbortController, AbortSignal, Element, Event, EventListener, document, document_query,
};

/// Errors raised by DOM operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
	#[error("no global `window` is available")]
	NoWindow,

	#[error("no `document` is available")]
	NoDocument,

	#[error("invalid selector: {0}")]
	InvalidSelector(String),

	#[error("DOM operation failed: {0}")]
	Operation(String),
}

#[cfg(target_arch = "wasm32")]
impl DomError {
	pub(crate) fn from_js(value: wasm_bindgen::JsValue) -> Self {
		DomError::Operation(format!("{value:?}"))
	}
}
