//! Hook-facing component API.

use std::cell::{Cell, Ref};
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::cell::{ComponentCell, Phase};
use super::resources::{FrameId, TimerId};
use super::{Component, ComponentError, ComponentHandle, ContextMap};
use crate::dom::{DomError, Element, Event};
use crate::{error_log, platform, spawn, warn_log};

/// Access to a component instance from inside its hooks.
///
/// A `Context` keeps the instance alive. Closures stored in listeners or
/// timers should capture a [`Scope`] instead.
pub struct Context<C: Component> {
	cell: Rc<ComponentCell<C>>,
}

impl<C: Component> Context<C> {
	pub(super) fn new(cell: Rc<ComponentCell<C>>) -> Self {
		Self { cell }
	}

	pub fn component(&self) -> &C {
		&self.cell.component
	}

	pub fn handle(&self) -> ComponentHandle<C> {
		ComponentHandle {
			cell: Rc::clone(&self.cell),
		}
	}

	/// A weak handle that can be moved into event handlers and timers.
	pub fn scope(&self) -> Scope<C> {
		Scope {
			cell: Rc::downgrade(&self.cell),
		}
	}

	pub fn props(&self) -> Ref<'_, C::Props> {
		self.cell.props.borrow()
	}

	pub fn state(&self) -> Ref<'_, C::State> {
		self.cell.state.borrow()
	}

	/// Mutates state in place. Changed keys are recorded and one update is
	/// scheduled for the current tick; writing equal values does nothing.
	pub fn set_state<F>(&self, mutate: F)
	where
		F: FnOnce(&mut C::State),
	{
		self.cell.set_state_with(mutate);
	}

	pub fn replace_state(&self, state: C::State) {
		self.cell.set_state_with(move |current| *current = state);
	}

	/// Whether `key` changed in the update pass being rendered.
	pub fn changed(&self, key: &str) -> bool {
		self.cell.lifecycle.borrow().changed.contains(key)
	}

	pub fn changed_keys(&self) -> Vec<String> {
		self.cell.lifecycle.borrow().changed.iter().cloned().collect()
	}

	pub fn is_first_render(&self) -> bool {
		self.cell.lifecycle.borrow().first_render
	}

	pub fn is_mounted(&self) -> bool {
		self.cell.phase() == Phase::Mounted
	}

	pub fn container(&self) -> Option<Element> {
		self.cell.container()
	}

	fn require_container(&self) -> Result<Element, ComponentError> {
		self.container().ok_or(ComponentError::NotMounted {
			component: C::name(),
		})
	}

	/// First element under the container matching `selector`.
	pub fn query(&self, selector: &str) -> Result<Option<Element>, ComponentError> {
		Ok(self.require_container()?.query_selector(selector)?)
	}

	fn resolve(&self, selector: &str) -> Result<Element, ComponentError> {
		self.query(selector)?
			.ok_or_else(|| ComponentError::ContainerMissing {
				selector: selector.to_string(),
			})
	}

	/// Declares a child keyed by its type and anchor selector.
	///
	/// See [`add_child_keyed`](Self::add_child_keyed).
	pub fn add_child<T: Component>(
		&self,
		props: T::Props,
		selector: &str,
	) -> Result<ComponentHandle<T>, ComponentError> {
		let key = format!("{}@{}", T::name(), selector);
		self.add_child_keyed(props, selector, &key)
	}

	/// Declares a child mounted into the element matching `selector`.
	///
	/// The first declaration renders the child synchronously and runs its
	/// `mounted` hook in the background. Declaring an existing key again
	/// replaces the child's props and runs its update pass when
	/// [`Component::should_update_child`] allows it. If the anchor element was
	/// replaced since, the child is re-rendered into the new anchor with its
	/// state kept.
	pub fn add_child_keyed<T: Component>(
		&self,
		props: T::Props,
		selector: &str,
		key: &str,
	) -> Result<ComponentHandle<T>, ComponentError> {
		let anchor = self.resolve(selector)?;
		let existing = self.cell.children.borrow().get(key);
		let handle = match existing {
			Some(existing) => {
				let handle = ComponentHandle::<T>::from_any(existing).ok_or_else(|| {
					ComponentError::PropsMismatch {
						key: key.to_string(),
						expected: T::name(),
					}
				})?;
				handle.cell.replace_props(props);
				if handle.container().as_ref() == Some(&anchor) {
					if self.cell.component.should_update_child(key, self) {
						handle.update();
					}
					return Ok(handle);
				}
				handle.cell.teardown();
				handle
			}
			None => ComponentHandle::<T>::new(props),
		};
		let inherited = self.cell.provided.borrow().for_children();
		if let Some(generation) = handle.cell.begin_mount(anchor, inherited)? {
			let cell = Rc::clone(&handle.cell);
			spawn::spawn_local(async move {
				if let Err(err) = cell.finish_mount(generation).await {
					error_log!("{} child failed to mount: {}", T::name(), err);
				}
			});
		}
		self.cell
			.children
			.borrow_mut()
			.insert(key.to_string(), handle.clone().into_any());
		Ok(handle)
	}

	pub fn get_child<T: Component>(&self, key: &str) -> Option<ComponentHandle<T>> {
		let child = self.cell.children.borrow().get(key)?;
		ComponentHandle::from_any(child)
	}

	pub fn has_child(&self, key: &str) -> bool {
		self.cell.children.borrow().get(key).is_some()
	}

	pub fn child_keys(&self) -> Vec<String> {
		self.cell.children.borrow().keys()
	}

	/// Unmounts and forgets the child under `key`.
	pub fn remove_child(&self, key: &str) -> bool {
		let removed = self.cell.children.borrow_mut().remove(key);
		match removed {
			Some(child) => {
				child.unmount_any();
				true
			}
			None => false,
		}
	}

	/// Listens on `target` until unmount, or until the next rebind when
	/// called from [`Component::bind_events`].
	pub fn listen<F>(&self, target: &Element, event_type: &str, handler: F) -> Result<(), ComponentError>
	where
		F: FnMut(&Event) + 'static,
	{
		let signal = self
			.cell
			.resources
			.borrow()
			.listener_signal()
			.ok_or(ComponentError::NotMounted {
				component: C::name(),
			})?;
		let listener = target.add_event_listener(event_type, handler, &signal)?;
		self.cell.resources.borrow_mut().keep_listener(listener);
		Ok(())
	}

	/// [`listen`](Self::listen) on the element matching `selector`.
	pub fn listen_selector<F>(
		&self,
		selector: &str,
		event_type: &str,
		handler: F,
	) -> Result<(), ComponentError>
	where
		F: FnMut(&Event) + 'static,
	{
		let target = self.resolve(selector)?;
		self.listen(&target, event_type, handler)
	}

	/// [`listen`](Self::listen) on the container itself.
	pub fn listen_container<F>(&self, event_type: &str, handler: F) -> Result<(), ComponentError>
	where
		F: FnMut(&Event) + 'static,
	{
		let container = self.require_container()?;
		self.listen(&container, event_type, handler)
	}

	fn ensure_active(&self) -> Result<(), ComponentError> {
		if self.cell.resources.borrow().is_active() {
			Ok(())
		} else {
			Err(ComponentError::NotMounted {
				component: C::name(),
			})
		}
	}

	/// Runs `callback` once after `delay`; cancelled on unmount.
	pub fn set_timeout<F>(&self, delay: Duration, callback: F) -> Result<TimerId, ComponentError>
	where
		F: FnOnce() + 'static,
	{
		self.ensure_active()?;
		let fired = Rc::new(Cell::new(false));
		let flag = Rc::clone(&fired);
		let timer = platform::set_timeout(delay, move || {
			flag.set(true);
			callback();
		})?;
		Ok(self
			.cell
			.resources
			.borrow_mut()
			.track_timer(timer, Some(fired)))
	}

	/// Runs `callback` every `period`; cancelled on unmount.
	pub fn set_interval<F>(&self, period: Duration, callback: F) -> Result<TimerId, ComponentError>
	where
		F: FnMut() + 'static,
	{
		self.ensure_active()?;
		let timer = platform::set_interval(period, callback)?;
		Ok(self.cell.resources.borrow_mut().track_timer(timer, None))
	}

	/// Cancels a timer; returns whether it was still pending.
	pub fn clear_timer(&self, id: TimerId) -> bool {
		self.cell.resources.borrow_mut().clear_timer(id)
	}

	pub fn request_animation_frame<F>(&self, callback: F) -> Result<FrameId, ComponentError>
	where
		F: FnOnce(f64) + 'static,
	{
		self.ensure_active()?;
		let fired = Rc::new(Cell::new(false));
		let flag = Rc::clone(&fired);
		let frame = platform::request_animation_frame(move |timestamp| {
			flag.set(true);
			callback(timestamp);
		})?;
		Ok(self.cell.resources.borrow_mut().track_frame(frame, fired))
	}

	pub fn cancel_animation_frame(&self, id: FrameId) -> bool {
		self.cell.resources.borrow_mut().cancel_frame(id)
	}

	/// Runs all `updates` together in the next animation frame.
	pub fn batch_update(&self, updates: Vec<Box<dyn FnOnce()>>) -> Result<FrameId, ComponentError> {
		self.request_animation_frame(move |_| {
			for update in updates {
				update();
			}
		})
	}

	fn patch<F>(&self, selector: &str, apply: F) -> bool
	where
		F: FnOnce(&Element) -> Result<(), DomError>,
	{
		let target = match self.query(selector) {
			Ok(Some(target)) => target,
			Ok(None) => return false,
			Err(err) => {
				warn_log!("{}: cannot patch `{}`: {}", C::name(), selector, err);
				return false;
			}
		};
		match apply(&target) {
			Ok(()) => true,
			Err(err) => {
				warn_log!("{}: patching `{}` failed: {}", C::name(), selector, err);
				false
			}
		}
	}

	/// Sets the text of the matching element. Returns `false` when nothing
	/// matched.
	pub fn update_text_content(&self, selector: &str, text: &str) -> bool {
		self.patch(selector, |target| {
			target.set_text_content(text);
			Ok(())
		})
	}

	/// Replaces the markup inside the matching element.
	pub fn update_inner_html(&self, selector: &str, html: &str) -> bool {
		self.patch(selector, |target| {
			target.set_inner_html(html);
			Ok(())
		})
	}

	pub fn update_attribute(&self, selector: &str, name: &str, value: &str) -> bool {
		self.patch(selector, |target| target.set_attribute(name, value))
	}

	/// Adds or removes `class` on the matching element.
	pub fn update_class(&self, selector: &str, class: &str, enabled: bool) -> bool {
		self.patch(selector, |target| {
			if enabled {
				target.add_class(class)
			} else {
				target.remove_class(class)
			}
		})
	}

	pub fn update_style(&self, selector: &str, property: &str, value: &str) -> bool {
		self.patch(selector, |target| target.set_style(property, value))
	}

	/// Makes `value` available to this component and its descendants.
	pub fn provide<T: 'static>(&self, value: T) {
		self.cell.provided.borrow_mut().own.insert(value);
	}

	/// Looks up a value provided by this component or an ancestor.
	pub fn consume<T: 'static>(&self) -> Option<Rc<T>> {
		self.cell.provided.borrow().get::<T>()
	}

	/// Everything a child mounted now would see through [`consume`](Self::consume).
	pub fn context_map(&self) -> ContextMap {
		self.cell.provided.borrow().for_children()
	}
}

/// Weak, cloneable handle to a component for use in callbacks.
///
/// Every method is a no-op once the component has been dropped.
pub struct Scope<C: Component> {
	cell: Weak<ComponentCell<C>>,
}

impl<C: Component> Clone for Scope<C> {
	fn clone(&self) -> Self {
		Self {
			cell: Weak::clone(&self.cell),
		}
	}
}

impl<C: Component> Scope<C> {
	pub fn context(&self) -> Option<Context<C>> {
		self.cell.upgrade().map(Context::new)
	}

	/// Mutates state; returns `false` when the component is gone.
	pub fn set_state<F>(&self, mutate: F) -> bool
	where
		F: FnOnce(&mut C::State),
	{
		match self.cell.upgrade() {
			Some(cell) => {
				cell.set_state_with(mutate);
				true
			}
			None => false,
		}
	}

	pub fn replace_state(&self, state: C::State) -> bool {
		self.set_state(move |current| *current = state)
	}

	pub fn update(&self) {
		if let Some(cell) = self.cell.upgrade() {
			cell.update();
		}
	}

	pub fn is_mounted(&self) -> bool {
		self.cell
			.upgrade()
			.is_some_and(|cell| cell.phase() == Phase::Mounted)
	}
}
