//! Per-mount resource tracking.
//!
//! Everything a component registers while mounted (listeners, timers,
//! intervals, animation frames) is recorded here and released in one pass
//! on unmount.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::dom::{AbortController, AbortSignal, DomError, EventListener};
use crate::platform::{AnimationFrame, Timer};

/// Handle to a timeout or interval registered through a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Handle to an animation frame registered through a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(u64);

/// Live resources held by a mounted component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceCounts {
	pub listeners: usize,
	pub timers: usize,
	pub frames: usize,
}

impl ResourceCounts {
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListenerScope {
	Lifetime,
	Bindings,
}

struct Tracked<H> {
	handle: H,
	fired: Option<Rc<Cell<bool>>>,
}

impl<H> Tracked<H> {
	fn is_live(&self) -> bool {
		self.fired.as_ref().is_none_or(|fired| !fired.get())
	}
}

/// Resources of one mount. The default value holds nothing and accepts no
/// registrations.
#[derive(Default)]
pub(super) struct Resources {
	lifetime: Option<AbortController>,
	bindings: Option<AbortController>,
	binding: bool,
	listeners: Vec<(ListenerScope, EventListener)>,
	timers: BTreeMap<TimerId, Tracked<Timer>>,
	frames: BTreeMap<FrameId, Tracked<AnimationFrame>>,
	next_id: u64,
}

impl Resources {
	pub(super) fn acquire() -> Result<Self, DomError> {
		Ok(Self {
			lifetime: Some(AbortController::new()?),
			bindings: Some(AbortController::new()?),
			..Self::default()
		})
	}

	pub(super) fn is_active(&self) -> bool {
		self.lifetime.is_some()
	}

	/// Marks whether `bind_events` is running; listeners registered meanwhile
	/// belong to the rebindable scope.
	pub(super) fn set_binding(&mut self, binding: bool) {
		self.binding = binding;
	}

	fn scope(&self) -> ListenerScope {
		if self.binding {
			ListenerScope::Bindings
		} else {
			ListenerScope::Lifetime
		}
	}

	pub(super) fn listener_signal(&self) -> Option<AbortSignal> {
		let controller = match self.scope() {
			ListenerScope::Lifetime => self.lifetime.as_ref(),
			ListenerScope::Bindings => self.bindings.as_ref(),
		};
		controller.map(AbortController::signal)
	}

	pub(super) fn keep_listener(&mut self, listener: EventListener) {
		let scope = self.scope();
		self.listeners.push((scope, listener));
	}

	/// Aborts every listener from the previous `bind_events` run.
	pub(super) fn renew_bindings(&mut self) -> Result<(), DomError> {
		if !self.is_active() {
			return Ok(());
		}
		let fresh = AbortController::new()?;
		if let Some(previous) = self.bindings.replace(fresh) {
			previous.abort();
		}
		self.listeners
			.retain(|(scope, _)| *scope == ListenerScope::Lifetime);
		Ok(())
	}

	fn allocate(&mut self) -> u64 {
		self.next_id += 1;
		self.next_id
	}

	pub(super) fn track_timer(&mut self, timer: Timer, fired: Option<Rc<Cell<bool>>>) -> TimerId {
		self.timers.retain(|_, tracked| tracked.is_live());
		let id = TimerId(self.allocate());
		self.timers.insert(
			id,
			Tracked {
				handle: timer,
				fired,
			},
		);
		id
	}

	pub(super) fn clear_timer(&mut self, id: TimerId) -> bool {
		match self.timers.remove(&id) {
			Some(tracked) => {
				tracked.handle.cancel();
				tracked.is_live()
			}
			None => false,
		}
	}

	pub(super) fn track_frame(&mut self, frame: AnimationFrame, fired: Rc<Cell<bool>>) -> FrameId {
		self.frames.retain(|_, tracked| tracked.is_live());
		let id = FrameId(self.allocate());
		self.frames.insert(
			id,
			Tracked {
				handle: frame,
				fired: Some(fired),
			},
		);
		id
	}

	pub(super) fn cancel_frame(&mut self, id: FrameId) -> bool {
		match self.frames.remove(&id) {
			Some(tracked) => {
				tracked.handle.cancel();
				tracked.is_live()
			}
			None => false,
		}
	}

	pub(super) fn counts(&self) -> ResourceCounts {
		ResourceCounts {
			listeners: self.listeners.len(),
			timers: self.timers.values().filter(|t| t.is_live()).count(),
			frames: self.frames.values().filter(|f| f.is_live()).count(),
		}
	}

	/// Aborts all listeners and cancels every pending timer and frame.
	pub(super) fn release(self) {
		for controller in [self.lifetime, self.bindings].into_iter().flatten() {
			controller.abort();
		}
		drop(self.listeners);
		for tracked in self.timers.into_values() {
			tracked.handle.cancel();
		}
		for tracked in self.frames.into_values() {
			tracked.handle.cancel();
		}
	}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use crate::dom::Element;
	use crate::platform::{self, clock};
	use rstest::rstest;
	use std::time::Duration;

	#[rstest]
	fn test_default_resources_are_inactive() {
		// Arrange
		let resources = Resources::default();

		// Assert
		assert!(!resources.is_active());
		assert!(resources.listener_signal().is_none());
	}

	#[rstest]
	fn test_renew_bindings_keeps_lifetime_listeners() {
		// Arrange
		let target = Element::new("div");
		let mut resources = Resources::acquire().unwrap();
		let signal = resources.listener_signal().unwrap();
		resources.keep_listener(target.add_event_listener("click", |_| {}, &signal).unwrap());
		resources.set_binding(true);
		let signal = resources.listener_signal().unwrap();
		resources.keep_listener(target.add_event_listener("click", |_| {}, &signal).unwrap());
		resources.set_binding(false);

		// Act
		resources.renew_bindings().unwrap();

		// Assert
		assert_eq!(resources.counts().listeners, 1);
		assert_eq!(target.listener_count(), 1);
	}

	#[rstest]
	fn test_release_cancels_everything() {
		// Arrange
		clock::reset();
		let target = Element::new("div");
		let mut resources = Resources::acquire().unwrap();
		let signal = resources.listener_signal().unwrap();
		resources.keep_listener(target.add_event_listener("click", |_| {}, &signal).unwrap());
		let timer = platform::set_interval(Duration::from_millis(5), || {}).unwrap();
		resources.track_timer(timer, None);
		let frame = platform::request_animation_frame(|_| {}).unwrap();
		resources.track_frame(frame, Rc::new(Cell::new(false)));

		// Act
		resources.release();

		// Assert
		assert_eq!(target.listener_count(), 0);
		assert_eq!(clock::pending_timers(), 0);
		assert_eq!(clock::pending_frames(), 0);
	}

	#[rstest]
	fn test_fired_timeouts_stop_counting() {
		// Arrange
		clock::reset();
		let mut resources = Resources::acquire().unwrap();
		let fired = Rc::new(Cell::new(false));
		let flag = fired.clone();
		let timer = platform::set_timeout(Duration::from_millis(1), move || flag.set(true)).unwrap();
		let id = resources.track_timer(timer, Some(fired));

		// Act
		clock::advance(Duration::from_millis(1));

		// Assert
		assert_eq!(resources.counts().timers, 0);
		assert!(!resources.clear_timer(id));
	}
}
