//! # Drop Note
//!
//! Browser client for the Drop Note paste service.
//!
//! The crate is the application shell: page components, the route table and
//! settings. Component lifecycle and client-side routing live in the
//! [`pages`] runtime crate.
//!
//! ## Layout
//!
//! - [`app`]: the [`App`] root component, pages and the paste data source
//! - [`settings`]: [`AppSettings`] loaded from `config/app.toml`
//!
//! ## Startup
//!
//! On `wasm32` the exported `start` function mounts the app into the element
//! selected by [`AppSettings::root_selector`]. Native builds render against an
//! in-memory document, which is what the integration tests drive:
//!
//! ```rust,ignore
//! use dropnote::{AppSettings, app::PasteService, launch};
//!
//! launch(AppSettings::embedded(), PasteService::empty());
//! ```

pub use dropnote_pages as pages;

pub mod app;
pub mod settings;

pub use app::{App, AppProps, PasteService, current_app, launch, shutdown};
pub use settings::{AppSettings, ListSettings, SettingsError};
