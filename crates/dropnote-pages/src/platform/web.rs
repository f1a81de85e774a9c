//! Browser timer backend.

use std::cell::Cell;
use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::TimerKind;
use crate::dom::DomError;

pub(super) struct TimerHandle {
	id: i32,
	_closure: Closure<dyn FnMut()>,
}

pub(super) struct FrameHandle {
	id: i32,
	_closure: Closure<dyn FnMut(f64)>,
}

fn window() -> Result<web_sys::Window, DomError> {
	web_sys::window().ok_or(DomError::NoWindow)
}

fn millis(duration: Duration) -> i32 {
	i32::try_from(duration.as_millis()).unwrap_or(i32::MAX)
}

pub(super) fn set_timeout(
	delay: Duration,
	callback: Box<dyn FnOnce()>,
) -> Result<TimerHandle, DomError> {
	let slot = Cell::new(Some(callback));
	let closure = Closure::wrap(Box::new(move || {
		if let Some(callback) = slot.take() {
			callback();
		}
	}) as Box<dyn FnMut()>);
	let id = window()?
		.set_timeout_with_callback_and_timeout_and_arguments_0(
			closure.as_ref().unchecked_ref(),
			millis(delay),
		)
		.map_err(DomError::from_js)?;
	Ok(TimerHandle {
		id,
		_closure: closure,
	})
}

pub(super) fn set_interval(
	period: Duration,
	callback: Box<dyn FnMut()>,
) -> Result<TimerHandle, DomError> {
	let closure = Closure::wrap(callback);
	let id = window()?
		.set_interval_with_callback_and_timeout_and_arguments_0(
			closure.as_ref().unchecked_ref(),
			millis(period),
		)
		.map_err(DomError::from_js)?;
	Ok(TimerHandle {
		id,
		_closure: closure,
	})
}

pub(super) fn clear_timer(handle: &TimerHandle, kind: TimerKind) {
	let Some(window) = web_sys::window() else {
		return;
	};
	match kind {
		TimerKind::Timeout => window.clear_timeout_with_handle(handle.id),
		TimerKind::Interval => window.clear_interval_with_handle(handle.id),
	}
}

pub(super) fn request_animation_frame(
	callback: Box<dyn FnOnce(f64)>,
) -> Result<FrameHandle, DomError> {
	let slot = Cell::new(Some(callback));
	let closure = Closure::wrap(Box::new(move |timestamp: f64| {
		if let Some(callback) = slot.take() {
			callback(timestamp);
		}
	}) as Box<dyn FnMut(f64)>);
	let id = window()?
		.request_animation_frame(closure.as_ref().unchecked_ref())
		.map_err(DomError::from_js)?;
	Ok(FrameHandle {
		id,
		_closure: closure,
	})
}

pub(super) fn cancel_frame(handle: &FrameHandle) {
	if let Some(window) = web_sys::window() {
		let _ = window.cancel_animation_frame(handle.id);
	}
}
