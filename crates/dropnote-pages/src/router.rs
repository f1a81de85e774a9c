//! Client-side routing
//!
//! A [`Router`] binds a container element to a table of [`RouteConfig`]s
//! and keeps exactly one route component mounted in it.
//!
//! ## Resolution
//!
//! `start`, `push`, `redirect` and history popstate all run the same pass:
//!
//! 1. Match the location against the table. Exact segment matches are tried
//!    first, then prefix matches; registration order breaks ties.
//! 2. Emit [`RouterEvent::BeforeRouteChange`].
//! 3. Await the route's guard, if any. `Ok(false)` stops silently, `Err`
//!    stops with a route error.
//! 4. Unmount the active component, then mount the new one.
//! 5. Emit [`RouterEvent::AfterRouteChange`], or a route error when the
//!    mount failed (the router is then left with no active route).
//!
//! Passes never overlap: each waits for the previous one to finish.
//!
//! ## Example
//!
//! ```ignore
//! use dropnote_pages::router::{RouteConfig, Router};
//!
//! let router = Router::new(outlet);
//! router.add_routes([
//!     RouteConfig::new::<MainPage>("/").exact(true).named("MainPage"),
//!     RouteConfig::new::<ListPage>("/list"),
//! ]);
//! router.on_error(|failure| error_log!("{}", failure.error));
//! router.start();
//! ```

mod core;
mod events;
mod handle;
mod history;
mod link;
mod params;
mod pattern;
mod query;
mod route;

pub use self::core::{Router, RouterError};
pub use events::{ListenerId, RouteChange, RouteFailure, RouterEvent, RouterEventKind};
pub use handle::{RouterContextExt, RouterHandle};
#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;
pub use history::{History, MemoryHistory, PopStateListener, PopStateSubscription, default_history};
pub use link::Link;
pub use params::{FromPath, PathError};
pub use pattern::{MatchMode, PathPattern};
pub use query::{parse_query, split_location};
pub use route::{GuardError, RouteConfig, RouteInfo};
