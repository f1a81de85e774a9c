//! Timers and animation frames
//!
//! Thin handles over `setTimeout`, `setInterval` and `requestAnimationFrame`.
//! Native builds schedule against a thread-local virtual [`clock`] that tests
//! advance by hand.

use std::time::Duration;

use crate::dom::DomError;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
use web as backend;

#[cfg(not(target_arch = "wasm32"))]
pub mod clock;
#[cfg(not(target_arch = "wasm32"))]
use clock as backend;

/// Whether a [`Timer`] fires once or repeatedly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
	Timeout,
	Interval,
}

/// A scheduled timeout or interval.
///
/// Dropping the handle does not cancel the timer; call [`Timer::cancel`].
pub struct Timer {
	kind: TimerKind,
	inner: backend::TimerHandle,
}

impl Timer {
	pub fn kind(&self) -> TimerKind {
		self.kind
	}

	/// Cancels the timer. Cancelling a timeout that already fired is harmless.
	pub fn cancel(&self) {
		backend::clear_timer(&self.inner, self.kind);
	}
}

impl std::fmt::Debug for Timer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Timer").field("kind", &self.kind).finish_non_exhaustive()
	}
}

/// A pending animation frame callback.
pub struct AnimationFrame {
	inner: backend::FrameHandle,
}

impl AnimationFrame {
	pub fn cancel(&self) {
		backend::cancel_frame(&self.inner);
	}
}

impl std::fmt::Debug for AnimationFrame {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AnimationFrame").finish_non_exhaustive()
	}
}

/// Runs `callback` once after `delay`.
pub fn set_timeout<F>(delay: Duration, callback: F) -> Result<Timer, DomError>
where
	F: FnOnce() + 'static,
{
	let inner = backend::set_timeout(delay, Box::new(callback))?;
	Ok(Timer {
		kind: TimerKind::Timeout,
		inner,
	})
}

/// Runs `callback` every `period` until cancelled.
pub fn set_interval<F>(period: Duration, callback: F) -> Result<Timer, DomError>
where
	F: FnMut() + 'static,
{
	let inner = backend::set_interval(period, Box::new(callback))?;
	Ok(Timer {
		kind: TimerKind::Interval,
		inner,
	})
}

/// Runs `callback` before the next repaint with the frame timestamp in
/// milliseconds.
pub fn request_animation_frame<F>(callback: F) -> Result<AnimationFrame, DomError>
where
	F: FnOnce(f64) + 'static,
{
	let inner = backend::request_animation_frame(Box::new(callback))?;
	Ok(AnimationFrame { inner })
}
