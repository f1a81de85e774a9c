//! Component lifecycle runtime
//!
//! Components render a string template into a container element, then keep
//! it current through targeted patches instead of re-rendering wholesale.
//!
//! ## Lifecycle
//!
//! 1. [`ComponentHandle::new`] builds the instance and runs `created`.
//! 2. `mount` renders `template` into the container, runs
//!    `mount_children` and `bind_events`, then awaits `mounted`.
//! 3. Every `set_state` records the top-level keys that changed and
//!    schedules one update per tick. The update runs
//!    `update_dynamic_content`, reconciles children by key and rebinds
//!    listeners when asked to.
//! 4. `unmount` releases listeners and timers, runs `cleanup`, unmounts the
//!    children and clears the container.
//!
//! ## Usage
//!
//! ```ignore
//! use dropnote_pages::component::ComponentHandle;
//!
//! let header = ComponentHandle::<Header>::new(HeaderProps::default());
//! header.mount(&container).await?;
//! header.set_state(|state| state.current_path = "/list".into());
//! ```

mod cell;
mod children;
mod context;
mod error;
mod provide;
mod resources;
mod state;
mod r#trait;

pub use cell::{ComponentHandle, Phase};
pub use children::DynComponent;
pub use context::{Context, Scope};
pub use error::ComponentError;
pub use provide::ContextMap;
pub use resources::{FrameId, ResourceCounts, TimerId};
pub use state::{WHOLE_STATE_KEY, changed_keys};
pub use r#trait::Component;
