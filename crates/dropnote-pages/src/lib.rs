//! Drop Note Pages - component runtime and client router
//!
//! The browser half of Drop Note: string-template components with an
//! explicit mount/update/unmount lifecycle, and a history-based router that
//! keeps one page component mounted at a time.
//!
//! ## Architecture
//!
//! - [`component`]: lifecycle driver, state diffing, keyed children and
//!   resource tracking
//! - [`router`]: route table, path matching, navigation and route events
//! - [`dom`]: the DOM slice the runtime needs (web-sys in the browser, an
//!   in-memory tree on native targets)
//! - [`platform`]: timers and animation frames
//! - [`spawn`]: local task and microtask scheduling
//! - [`markup`]: escaping helpers for templates
//!
//! Native builds are fully functional against the in-memory DOM, a virtual
//! clock and a thread-local executor, which is how the test suite runs.
//!
//! ## Example
//!
//! ```ignore
//! use dropnote_pages::{Component, Context, async_trait};
//!
//! struct Greeting;
//!
//! #[async_trait(?Send)]
//! impl Component for Greeting {
//!     type Props = String;
//!     type State = ();
//!
//!     fn create(_props: &String) -> Self {
//!         Greeting
//!     }
//!
//!     fn template(&self, ctx: &Context<Self>) -> String {
//!         format!("<h1>Hello, {}</h1>", dropnote_pages::markup::escape_html(&ctx.props()))
//!     }
//! }
//! ```

// Core modules
pub mod callback;
pub mod dom;
pub mod logging;
pub mod markup;
pub mod platform;
pub mod spawn;

// Component system
pub mod component;

// Client-side routing
pub mod router;

pub use async_trait::async_trait;
pub use callback::Callback;
pub use component::{
	Component, ComponentError, ComponentHandle, Context, ContextMap, DynComponent, Phase, Scope,
};
pub use dom::{DomError, Element, Event};
pub use router::{
	GuardError, Link, RouteConfig, RouteInfo, Router, RouterContextExt, RouterError,
	RouterEvent, RouterHandle,
};

#[doc(hidden)]
pub mod __private {
	#[cfg(not(target_arch = "wasm32"))]
	pub use tracing;
	#[cfg(target_arch = "wasm32")]
	pub use web_sys;
}
