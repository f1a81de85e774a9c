//! Virtual clock backing timers on native targets
//!
//! Nothing fires on its own: [`advance`] moves time forward and runs every
//! timer that comes due in order, and [`run_animation_frames`] flushes the
//! frame queue. State is per thread, so each test starts from zero.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use super::TimerKind;
use crate::dom::DomError;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

type RepeatCallback = Rc<RefCell<Box<dyn FnMut()>>>;

enum TimerTask {
	Once(Box<dyn FnOnce()>),
	Repeat {
		period: Duration,
		callback: RepeatCallback,
	},
}

struct ScheduledTimer {
	due: Duration,
	task: TimerTask,
}

enum Due {
	Once(Box<dyn FnOnce()>),
	Repeat(RepeatCallback),
}

#[derive(Default)]
struct Clock {
	now: Duration,
	next_id: u64,
	timers: BTreeMap<u64, ScheduledTimer>,
	frames: BTreeMap<u64, Box<dyn FnOnce(f64)>>,
}

impl Clock {
	fn allocate_id(&mut self) -> u64 {
		self.next_id += 1;
		self.next_id
	}

	fn take_due(&mut self, target: Duration) -> Option<Due> {
		let (id, _) = self
			.timers
			.iter()
			.filter(|(_, timer)| timer.due <= target)
			.min_by_key(|(id, timer)| (timer.due, **id))?;
		let id = *id;
		let timer = self.timers.remove(&id)?;
		self.now = timer.due;
		match timer.task {
			TimerTask::Once(callback) => Some(Due::Once(callback)),
			TimerTask::Repeat { period, callback } => {
				self.timers.insert(
					id,
					ScheduledTimer {
						due: timer.due + period,
						task: TimerTask::Repeat {
							period,
							callback: callback.clone(),
						},
					},
				);
				Some(Due::Repeat(callback))
			}
		}
	}
}

thread_local! {
	static CLOCK: RefCell<Clock> = RefCell::new(Clock::default());
}

pub(super) struct TimerHandle {
	id: u64,
}

pub(super) struct FrameHandle {
	id: u64,
}

fn schedule(delay: Duration, task: TimerTask) -> u64 {
	CLOCK.with(|clock| {
		let mut clock = clock.borrow_mut();
		let id = clock.allocate_id();
		let due = clock.now + delay;
		clock.timers.insert(id, ScheduledTimer { due, task });
		id
	})
}

pub(super) fn set_timeout(
	delay: Duration,
	callback: Box<dyn FnOnce()>,
) -> Result<TimerHandle, DomError> {
	let id = schedule(delay, TimerTask::Once(callback));
	Ok(TimerHandle { id })
}

pub(super) fn set_interval(
	period: Duration,
	callback: Box<dyn FnMut()>,
) -> Result<TimerHandle, DomError> {
	let period = period.max(MIN_INTERVAL);
	let task = TimerTask::Repeat {
		period,
		callback: Rc::new(RefCell::new(callback)),
	};
	let id = schedule(period, task);
	Ok(TimerHandle { id })
}

pub(super) fn clear_timer(handle: &TimerHandle, _kind: TimerKind) {
	CLOCK.with(|clock| {
		clock.borrow_mut().timers.remove(&handle.id);
	});
}

pub(super) fn request_animation_frame(
	callback: Box<dyn FnOnce(f64)>,
) -> Result<FrameHandle, DomError> {
	let id = CLOCK.with(|clock| {
		let mut clock = clock.borrow_mut();
		let id = clock.allocate_id();
		clock.frames.insert(id, callback);
		id
	});
	Ok(FrameHandle { id })
}

pub(super) fn cancel_frame(handle: &FrameHandle) {
	CLOCK.with(|clock| {
		clock.borrow_mut().frames.remove(&handle.id);
	});
}

/// Current virtual time.
pub fn now() -> Duration {
	CLOCK.with(|clock| clock.borrow().now)
}

/// Number of timeouts and intervals still scheduled.
pub fn pending_timers() -> usize {
	CLOCK.with(|clock| clock.borrow().timers.len())
}

/// Number of animation frames waiting for the next flush.
pub fn pending_frames() -> usize {
	CLOCK.with(|clock| clock.borrow().frames.len())
}

/// Moves virtual time forward by `by`, firing due timers in order.
///
/// Timers scheduled by a callback fire within the same call when they fall
/// inside the window.
pub fn advance(by: Duration) {
	let target = now() + by;
	loop {
		let due = CLOCK.with(|clock| clock.borrow_mut().take_due(target));
		match due {
			None => break,
			Some(Due::Once(callback)) => callback(),
			Some(Due::Repeat(callback)) => {
				if let Ok(mut callback) = callback.try_borrow_mut() {
					(*callback)();
				}
			}
		}
	}
	CLOCK.with(|clock| {
		let mut clock = clock.borrow_mut();
		if clock.now < target {
			clock.now = target;
		}
	});
}

/// Runs every frame callback queued so far and returns how many ran.
///
/// Frames requested while flushing wait for the next call.
pub fn run_animation_frames() -> usize {
	let (timestamp, frames) = CLOCK.with(|clock| {
		let mut clock = clock.borrow_mut();
		let timestamp = clock.now.as_secs_f64() * 1000.0;
		(timestamp, std::mem::take(&mut clock.frames))
	});
	let count = frames.len();
	for (_, callback) in frames {
		callback(timestamp);
	}
	count
}

/// Drops every pending timer and frame and rewinds time to zero.
pub fn reset() {
	CLOCK.with(|clock| {
		*clock.borrow_mut() = Clock::default();
	});
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::platform::{request_animation_frame, set_interval, set_timeout};
	use rstest::rstest;
	use std::cell::Cell;

	#[rstest]
	fn test_timeout_fires_once_when_due() {
		// Arrange
		reset();
		let fired = Rc::new(Cell::new(0));
		let counter = fired.clone();
		let _timer = set_timeout(Duration::from_millis(100), move || {
			counter.set(counter.get() + 1)
		})
		.unwrap();

		// Act
		advance(Duration::from_millis(99));
		let before = fired.get();
		advance(Duration::from_millis(1));
		advance(Duration::from_millis(500));

		// Assert
		assert_eq!(before, 0);
		assert_eq!(fired.get(), 1);
		assert_eq!(pending_timers(), 0);
	}

	#[rstest]
	fn test_interval_repeats_until_cancelled() {
		// Arrange
		reset();
		let ticks = Rc::new(Cell::new(0));
		let counter = ticks.clone();
		let timer = set_interval(Duration::from_millis(10), move || {
			counter.set(counter.get() + 1)
		})
		.unwrap();

		// Act
		advance(Duration::from_millis(35));
		timer.cancel();
		advance(Duration::from_millis(100));

		// Assert
		assert_eq!(ticks.get(), 3);
		assert_eq!(pending_timers(), 0);
	}

	#[rstest]
	fn test_timers_fire_in_due_order() {
		// Arrange
		reset();
		let log = Rc::new(RefCell::new(Vec::new()));
		for (label, delay) in [("late", 30), ("early", 10), ("middle", 20)] {
			let log = log.clone();
			set_timeout(Duration::from_millis(delay), move || {
				log.borrow_mut().push(label)
			})
			.unwrap();
		}

		// Act
		advance(Duration::from_millis(30));

		// Assert
		assert_eq!(*log.borrow(), vec!["early", "middle", "late"]);
		assert_eq!(now(), Duration::from_millis(30));
	}

	#[rstest]
	fn test_cancelled_frame_never_runs() {
		// Arrange
		reset();
		let ran = Rc::new(Cell::new(false));
		let flag = ran.clone();
		let frame = request_animation_frame(move |_| flag.set(true)).unwrap();
		let kept = Rc::new(Cell::new(false));
		let kept_flag = kept.clone();
		request_animation_frame(move |_| kept_flag.set(true)).unwrap();

		// Act
		frame.cancel();
		let count = run_animation_frames();

		// Assert
		assert_eq!(count, 1);
		assert!(!ran.get());
		assert!(kept.get());
		assert_eq!(pending_frames(), 0);
	}
}
