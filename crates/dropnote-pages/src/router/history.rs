//! Session history backends.
//!
//! The router talks to history through the [`History`] trait: the browser
//! implementation drives `window.history`, and [`MemoryHistory`] keeps an
//! entry stack in memory for native builds and tests. Both deliver
//! `popstate` notifications asynchronously, after the call that moved the
//! cursor has returned.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::core::RouterError;
use crate::spawn;

/// Callback invoked on every popstate.
pub type PopStateListener = Rc<dyn Fn()>;

/// Access to a navigation history stack.
pub trait History {
	/// Current pathname plus query string.
	fn location(&self) -> String;

	/// Adds an entry after the current one, dropping any forward entries.
	fn push_state(&self, path: &str) -> Result<(), RouterError>;

	/// Overwrites the current entry.
	fn replace_state(&self, path: &str) -> Result<(), RouterError>;

	/// Moves the cursor by `delta`; out-of-range moves are ignored.
	fn go(&self, delta: i32);

	/// Registers `listener` for popstate until the subscription is dropped.
	fn subscribe(&self, listener: PopStateListener) -> PopStateSubscription;
}

/// Keeps a popstate listener registered while alive.
pub struct PopStateSubscription {
	unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl PopStateSubscription {
	pub fn new<F>(unsubscribe: F) -> Self
	where
		F: FnOnce() + 'static,
	{
		Self {
			unsubscribe: Some(Box::new(unsubscribe)),
		}
	}

	/// A subscription with nothing to release.
	pub fn detached() -> Self {
		Self { unsubscribe: None }
	}
}

impl Drop for PopStateSubscription {
	fn drop(&mut self) {
		if let Some(unsubscribe) = self.unsubscribe.take() {
			unsubscribe();
		}
	}
}

impl std::fmt::Debug for PopStateSubscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PopStateSubscription")
			.field("active", &self.unsubscribe.is_some())
			.finish()
	}
}

/// The history the router uses when none is supplied.
pub fn default_history() -> Rc<dyn History> {
	#[cfg(target_arch = "wasm32")]
	{
		Rc::new(BrowserHistory)
	}
	#[cfg(not(target_arch = "wasm32"))]
	{
		Rc::new(MemoryHistory::default())
	}
}

struct MemoryState {
	entries: RefCell<Vec<String>>,
	index: Cell<usize>,
	listeners: RefCell<Vec<(u64, PopStateListener)>>,
	next_listener: Cell<u64>,
}

/// In-memory history stack. Clones share the same stack.
#[derive(Clone)]
pub struct MemoryHistory {
	state: Rc<MemoryState>,
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new("/")
	}
}

impl MemoryHistory {
	pub fn new(initial: &str) -> Self {
		Self {
			state: Rc::new(MemoryState {
				entries: RefCell::new(vec![initial.to_string()]),
				index: Cell::new(0),
				listeners: RefCell::new(Vec::new()),
				next_listener: Cell::new(0),
			}),
		}
	}

	pub fn entries(&self) -> Vec<String> {
		self.state.entries.borrow().clone()
	}

	pub fn index(&self) -> usize {
		self.state.index.get()
	}

	pub fn len(&self) -> usize {
		self.state.entries.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.state.entries.borrow().is_empty()
	}

	pub fn listener_count(&self) -> usize {
		self.state.listeners.borrow().len()
	}
}

impl std::fmt::Debug for MemoryHistory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryHistory")
			.field("entries", &*self.state.entries.borrow())
			.field("index", &self.state.index.get())
			.finish()
	}
}

impl History for MemoryHistory {
	fn location(&self) -> String {
		let entries = self.state.entries.borrow();
		entries
			.get(self.state.index.get())
			.cloned()
			.unwrap_or_default()
	}

	fn push_state(&self, path: &str) -> Result<(), RouterError> {
		let mut entries = self.state.entries.borrow_mut();
		let index = self.state.index.get();
		entries.truncate(index + 1);
		entries.push(path.to_string());
		self.state.index.set(entries.len() - 1);
		Ok(())
	}

	fn replace_state(&self, path: &str) -> Result<(), RouterError> {
		let mut entries = self.state.entries.borrow_mut();
		match entries.get_mut(self.state.index.get()) {
			Some(entry) => *entry = path.to_string(),
			None => entries.push(path.to_string()),
		}
		Ok(())
	}

	fn go(&self, delta: i32) {
		if delta == 0 {
			return;
		}
		let len = self.len() as i64;
		let target = self.state.index.get() as i64 + i64::from(delta);
		if !(0..len).contains(&target) {
			return;
		}
		self.state.index.set(target as usize);
		let state = Rc::downgrade(&self.state);
		spawn::spawn_local(async move {
			let Some(state) = state.upgrade() else {
				return;
			};
			let listeners: Vec<PopStateListener> = state
				.listeners
				.borrow()
				.iter()
				.map(|(_, listener)| Rc::clone(listener))
				.collect();
			for listener in listeners {
				listener();
			}
		});
	}

	fn subscribe(&self, listener: PopStateListener) -> PopStateSubscription {
		let id = self.state.next_listener.get() + 1;
		self.state.next_listener.set(id);
		self.state.listeners.borrow_mut().push((id, listener));
		let state = Rc::downgrade(&self.state);
		PopStateSubscription::new(move || {
			if let Some(state) = state.upgrade() {
				state
					.listeners
					.borrow_mut()
					.retain(|(existing, _)| *existing != id);
			}
		})
	}
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;

#[cfg(target_arch = "wasm32")]
mod browser {
	use wasm_bindgen::JsCast;
	use wasm_bindgen::prelude::*;

	use super::{History, PopStateListener, PopStateSubscription};
	use crate::error_log;
	use crate::router::RouterError;

	/// `window.history` with `popstate` notifications.
	#[derive(Debug, Default, Clone, Copy)]
	pub struct BrowserHistory;

	fn history() -> Result<web_sys::History, RouterError> {
		web_sys::window()
			.ok_or_else(|| RouterError::History("no window".to_string()))?
			.history()
			.map_err(|err| RouterError::History(format!("{err:?}")))
	}

	impl History for BrowserHistory {
		fn location(&self) -> String {
			let Some(window) = web_sys::window() else {
				return "/".to_string();
			};
			let location = window.location();
			let pathname = location.pathname().unwrap_or_else(|_| "/".to_string());
			let search = location.search().unwrap_or_default();
			format!("{pathname}{search}")
		}

		fn push_state(&self, path: &str) -> Result<(), RouterError> {
			history()?
				.push_state_with_url(&JsValue::NULL, "", Some(path))
				.map_err(|err| RouterError::History(format!("{err:?}")))
		}

		fn replace_state(&self, path: &str) -> Result<(), RouterError> {
			history()?
				.replace_state_with_url(&JsValue::NULL, "", Some(path))
				.map_err(|err| RouterError::History(format!("{err:?}")))
		}

		fn go(&self, delta: i32) {
			let result = history().and_then(|history| {
				history
					.go_with_delta(delta)
					.map_err(|err| RouterError::History(format!("{err:?}")))
			});
			if let Err(err) = result {
				error_log!("history.go({}) failed: {}", delta, err);
			}
		}

		fn subscribe(&self, listener: PopStateListener) -> PopStateSubscription {
			let Some(window) = web_sys::window() else {
				return PopStateSubscription::detached();
			};
			let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
				listener();
			}) as Box<dyn FnMut(web_sys::Event)>);
			if let Err(err) =
				window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
			{
				error_log!("failed to listen for popstate: {:?}", err);
				return PopStateSubscription::detached();
			}
			PopStateSubscription::new(move || {
				let _ = window
					.remove_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
				drop(closure);
			})
		}
	}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use crate::spawn::run_until_stalled;
	use rstest::rstest;

	#[rstest]
	fn test_push_drops_forward_entries() {
		// Arrange
		let history = MemoryHistory::new("/");
		history.push_state("/a").unwrap();
		history.push_state("/b").unwrap();
		history.go(-2);

		// Act
		history.push_state("/c").unwrap();

		// Assert
		assert_eq!(history.entries(), vec!["/", "/c"]);
		assert_eq!(history.location(), "/c");
	}

	#[rstest]
	fn test_replace_overwrites_current_entry() {
		// Arrange
		let history = MemoryHistory::new("/");
		history.push_state("/list").unwrap();

		// Act
		history.replace_state("/list?page=2").unwrap();

		// Assert
		assert_eq!(history.entries(), vec!["/", "/list?page=2"]);
	}

	#[rstest]
	#[case(-1, "/a", true)]
	#[case(-5, "/b", false)]
	#[case(1, "/b", false)]
	#[case(0, "/b", false)]
	fn test_go_moves_within_bounds_and_notifies_later(
		#[case] delta: i32,
		#[case] expected: &str,
		#[case] notified: bool,
	) {
		// Arrange
		let history = MemoryHistory::new("/a");
		history.push_state("/b").unwrap();
		let fired = Rc::new(Cell::new(0));
		let counter = fired.clone();
		let _subscription = history.subscribe(Rc::new(move || counter.set(counter.get() + 1)));

		// Act
		history.go(delta);
		let fired_synchronously = fired.get();
		run_until_stalled();

		// Assert
		assert_eq!(history.location(), expected);
		assert_eq!(fired_synchronously, 0);
		assert_eq!(fired.get(), usize::from(notified));
	}

	#[rstest]
	fn test_dropping_subscription_unsubscribes() {
		// Arrange
		let history = MemoryHistory::new("/a");
		let subscription = history.subscribe(Rc::new(|| {}));
		assert_eq!(history.listener_count(), 1);

		// Act
		drop(subscription);

		// Assert
		assert_eq!(history.listener_count(), 0);
	}
}
