//! Lifecycle driver.
//!
//! A [`ComponentCell`] owns one component instance together with its props,
//! state, children and mount-scoped resources. The driver functions here
//! implement mount, coalesced updates and unmount; hooks only ever see the
//! cell through a [`Context`].

use std::any::Any;
use std::cell::{Ref, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use super::children::{AnyComponent, Children};
use super::provide::Provided;
use super::resources::{ResourceCounts, Resources};
use super::state::differing_keys;
use super::{Component, ComponentError, Context, ContextMap};
use crate::dom::{self, Element};
use crate::spawn;
use crate::{debug_log, error_log, warn_log};

/// Where a component is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	Unmounted,
	/// First render done, `mounted` hook still pending.
	Mounting,
	Mounted,
}

pub(super) struct Lifecycle<C: Component> {
	pub(super) phase: Phase,
	pub(super) first_render: bool,
	pub(super) update_scheduled: bool,
	pub(super) container: Option<Element>,
	rendered_props: Option<C::Props>,
	rendered_state: Option<C::State>,
	pub(super) changed: BTreeSet<String>,
	generation: u64,
	renders: u64,
}

impl<C: Component> Default for Lifecycle<C> {
	fn default() -> Self {
		Self {
			phase: Phase::Unmounted,
			first_render: true,
			update_scheduled: false,
			container: None,
			rendered_props: None,
			rendered_state: None,
			changed: BTreeSet::new(),
			generation: 0,
			renders: 0,
		}
	}
}

pub(super) struct ComponentCell<C: Component> {
	pub(super) component: C,
	pub(super) props: RefCell<C::Props>,
	pub(super) state: RefCell<C::State>,
	pub(super) lifecycle: RefCell<Lifecycle<C>>,
	pub(super) children: RefCell<Children>,
	pub(super) resources: RefCell<Resources>,
	pub(super) provided: RefCell<Provided>,
}

impl<C: Component> ComponentCell<C> {
	fn new(props: C::Props) -> Rc<Self> {
		Rc::new(Self {
			component: C::create(&props),
			state: RefCell::new(C::initial_state(&props)),
			props: RefCell::new(props),
			lifecycle: RefCell::new(Lifecycle::default()),
			children: RefCell::new(Children::default()),
			resources: RefCell::new(Resources::default()),
			provided: RefCell::new(Provided::default()),
		})
	}

	fn context(self: &Rc<Self>) -> Context<C> {
		Context::new(Rc::clone(self))
	}

	pub(super) fn phase(&self) -> Phase {
		self.lifecycle.borrow().phase
	}

	pub(super) fn container(&self) -> Option<Element> {
		self.lifecycle.borrow().container.clone()
	}

	/// Synchronous half of mounting: first render, children and listeners.
	///
	/// Returns the mount generation to pass to [`finish_mount`](Self::finish_mount),
	/// or `None` when the component was already mounted.
	pub(super) fn begin_mount(
		self: &Rc<Self>,
		container: Element,
		inherited: ContextMap,
	) -> Result<Option<u64>, ComponentError> {
		if self.phase() != Phase::Unmounted {
			warn_log!("{} is already mounted", C::name());
			return Ok(None);
		}
		*self.resources.borrow_mut() = Resources::acquire()?;
		self.provided.borrow_mut().inherited = inherited;
		let generation = {
			let mut lifecycle = self.lifecycle.borrow_mut();
			lifecycle.phase = Phase::Mounting;
			lifecycle.first_render = true;
			lifecycle.generation += 1;
			lifecycle.container = Some(container.clone());
			lifecycle.generation
		};
		if let Err(err) = self.render_first(&container) {
			error_log!("{} failed to mount: {}", C::name(), err);
			self.teardown();
			return Err(err);
		}
		Ok(Some(generation))
	}

	fn render_first(self: &Rc<Self>, container: &Element) -> Result<(), ComponentError> {
		let ctx = self.context();
		self.snapshot();
		let markup = self.component.template(&ctx);
		container.set_inner_html(&markup);
		self.component.mount_children(&ctx)?;
		self.bind_events(&ctx);
		let mut lifecycle = self.lifecycle.borrow_mut();
		lifecycle.first_render = false;
		lifecycle.renders += 1;
		Ok(())
	}

	/// Asynchronous half of mounting: awaits the `mounted` hook.
	pub(super) async fn finish_mount(self: Rc<Self>, generation: u64) -> Result<(), ComponentError> {
		let ctx = self.context();
		let result = self.component.mounted(&ctx).await;
		let current = {
			let lifecycle = self.lifecycle.borrow();
			lifecycle.phase == Phase::Mounting && lifecycle.generation == generation
		};
		if !current {
			debug_log!("{} was unmounted before its mounted hook finished", C::name());
			return result;
		}
		match result {
			Ok(()) => {
				self.lifecycle.borrow_mut().phase = Phase::Mounted;
				if self.is_dirty() {
					self.schedule_update();
				}
				Ok(())
			}
			Err(err) => {
				error_log!("{} failed to mount: {}", C::name(), err);
				self.teardown();
				Err(err)
			}
		}
	}

	pub(super) async fn mount(
		self: Rc<Self>,
		container: Element,
		inherited: ContextMap,
	) -> Result<(), ComponentError> {
		match self.begin_mount(container, inherited)? {
			Some(generation) => self.finish_mount(generation).await,
			None => Ok(()),
		}
	}

	fn bind_events(self: &Rc<Self>, ctx: &Context<C>) {
		self.resources.borrow_mut().set_binding(true);
		self.component.bind_events(ctx);
		self.resources.borrow_mut().set_binding(false);
	}

	fn snapshot(&self) {
		let props = self.props.borrow().clone();
		let state = self.state.borrow().clone();
		let mut lifecycle = self.lifecycle.borrow_mut();
		lifecycle.rendered_props = Some(props);
		lifecycle.rendered_state = Some(state);
		lifecycle.changed.clear();
	}

	/// State keys and props change since the last render.
	fn pending_changes(&self) -> (BTreeSet<String>, bool) {
		let lifecycle = self.lifecycle.borrow();
		let state = self.state.borrow();
		let changed = match &lifecycle.rendered_state {
			Some(rendered) if *rendered != *state => differing_keys(rendered, &*state),
			_ => BTreeSet::new(),
		};
		let props_changed = lifecycle
			.rendered_props
			.as_ref()
			.is_some_and(|rendered| *rendered != *self.props.borrow());
		(changed, props_changed)
	}

	fn is_dirty(&self) -> bool {
		let (changed, props_changed) = self.pending_changes();
		!changed.is_empty() || props_changed
	}

	/// Re-renders the dynamic parts when props or state changed since the
	/// last render.
	pub(super) fn update(self: &Rc<Self>) {
		let phase = self.phase();
		if phase != Phase::Mounted {
			debug_log!("{}: update skipped while {:?}", C::name(), phase);
			return;
		}
		let (changed, props_changed) = self.pending_changes();
		if changed.is_empty() && !props_changed {
			self.lifecycle.borrow_mut().changed.clear();
			return;
		}
		self.snapshot();
		self.lifecycle.borrow_mut().changed = changed;
		let ctx = self.context();
		self.component.update_dynamic_content(&ctx);
		if let Err(err) = self.component.mount_children(&ctx) {
			error_log!("{} failed to reconcile children: {}", C::name(), err);
		}
		if self.component.should_rebind_events(&ctx) {
			self.rebind_events(&ctx);
		}
		let mut lifecycle = self.lifecycle.borrow_mut();
		lifecycle.changed.clear();
		lifecycle.renders += 1;
	}

	fn rebind_events(self: &Rc<Self>, ctx: &Context<C>) {
		if let Err(err) = self.resources.borrow_mut().renew_bindings() {
			error_log!("{} failed to rebind events: {}", C::name(), err);
			return;
		}
		self.bind_events(ctx);
	}

	fn schedule_update(self: &Rc<Self>) {
		self.lifecycle.borrow_mut().update_scheduled = true;
		let weak = Rc::downgrade(self);
		spawn::queue_microtask(move || {
			if let Some(cell) = weak.upgrade() {
				cell.lifecycle.borrow_mut().update_scheduled = false;
				cell.update();
			}
		});
	}

	/// Schedules one update for the current tick unless one is pending or
	/// the component is not fully mounted.
	fn request_update(self: &Rc<Self>) {
		let schedule = {
			let lifecycle = self.lifecycle.borrow();
			lifecycle.phase == Phase::Mounted && !lifecycle.update_scheduled
		};
		if schedule {
			self.schedule_update();
		}
	}

	pub(super) fn set_state_with<F>(self: &Rc<Self>, mutate: F)
	where
		F: FnOnce(&mut C::State),
	{
		let changed = {
			let mut state = self.state.borrow_mut();
			let before = state.clone();
			mutate(&mut state);
			if before == *state {
				return;
			}
			differing_keys(&before, &*state)
		};
		self.lifecycle.borrow_mut().changed.extend(changed);
		self.request_update();
	}

	/// Replaces props; returns whether they differ from the previous value.
	pub(super) fn replace_props(&self, props: C::Props) -> bool {
		let previous = self.props.replace(props);
		previous != *self.props.borrow()
	}

	pub(super) fn set_props(self: &Rc<Self>, props: C::Props) {
		if self.replace_props(props) {
			self.request_update();
		}
	}

	pub(super) fn unmount(self: &Rc<Self>) {
		if self.phase() == Phase::Unmounted {
			warn_log!("{} is not mounted", C::name());
			return;
		}
		self.teardown();
	}

	/// Releases resources, runs `cleanup`, unmounts children and clears
	/// the container, in that order.
	pub(super) fn teardown(self: &Rc<Self>) {
		let resources = std::mem::take(&mut *self.resources.borrow_mut());
		resources.release();
		self.component.cleanup(&self.context());
		let children = self.children.borrow_mut().take_all();
		for (_, child) in children {
			child.unmount_any();
		}
		let container = self.lifecycle.borrow_mut().container.take();
		if let Some(container) = container {
			container.set_inner_html("");
		}
		{
			let mut lifecycle = self.lifecycle.borrow_mut();
			lifecycle.phase = Phase::Unmounted;
			lifecycle.first_render = true;
			lifecycle.update_scheduled = false;
			lifecycle.rendered_props = None;
			lifecycle.rendered_state = None;
			lifecycle.changed.clear();
		}
		self.provided.borrow_mut().inherited = ContextMap::default();
	}
}

impl<C: Component> AnyComponent for ComponentCell<C> {
	fn component_name(&self) -> &'static str {
		C::name()
	}

	fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
		self
	}

	fn mount_any(
		self: Rc<Self>,
		container: Element,
		inherited: ContextMap,
	) -> LocalBoxFuture<'static, Result<(), ComponentError>> {
		self.mount(container, inherited).boxed_local()
	}

	fn update_any(self: Rc<Self>) {
		self.update();
	}

	fn unmount_any(self: Rc<Self>) {
		self.unmount();
	}

	fn is_mounted_any(&self) -> bool {
		self.phase() == Phase::Mounted
	}
}

/// Owning handle to a component instance.
///
/// Clones refer to the same instance.
pub struct ComponentHandle<C: Component> {
	pub(super) cell: Rc<ComponentCell<C>>,
}

impl<C: Component> Clone for ComponentHandle<C> {
	fn clone(&self) -> Self {
		Self {
			cell: Rc::clone(&self.cell),
		}
	}
}

impl<C: Component> std::fmt::Debug for ComponentHandle<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ComponentHandle")
			.field("name", &C::name())
			.field("phase", &self.phase())
			.finish()
	}
}

impl<C: Component> ComponentHandle<C> {
	/// Builds the component and runs its `created` hook.
	pub fn new(props: C::Props) -> Self {
		let handle = Self {
			cell: ComponentCell::new(props),
		};
		handle.cell.component.created(&handle.context());
		handle
	}

	pub(super) fn from_any(any: Rc<dyn AnyComponent>) -> Option<Self> {
		any.as_any_rc()
			.downcast::<ComponentCell<C>>()
			.ok()
			.map(|cell| Self { cell })
	}

	pub(super) fn into_any(self) -> Rc<dyn AnyComponent> {
		self.cell
	}

	/// A hook context for this instance.
	pub fn context(&self) -> Context<C> {
		self.cell.context()
	}

	pub fn component(&self) -> &C {
		&self.cell.component
	}

	/// Renders into `container`, attaches children and listeners, then
	/// awaits the `mounted` hook.
	///
	/// Mounting an already mounted component logs a warning and does
	/// nothing. On failure the component is left fully unmounted.
	pub async fn mount(&self, container: &Element) -> Result<(), ComponentError> {
		self.mount_with(container, ContextMap::default()).await
	}

	/// Like [`mount`](Self::mount) with `context` visible to
	/// [`Context::consume`].
	pub async fn mount_with(
		&self,
		container: &Element,
		context: ContextMap,
	) -> Result<(), ComponentError> {
		Rc::clone(&self.cell)
			.mount(container.clone(), context)
			.await
	}

	/// Mounts into the first document element matching `selector`.
	pub async fn mount_to(&self, selector: &str) -> Result<(), ComponentError> {
		let container =
			dom::document_query(selector)?.ok_or_else(|| ComponentError::ContainerMissing {
				selector: selector.to_string(),
			})?;
		self.mount(&container).await
	}

	/// Runs an update pass now if props or state changed.
	pub fn update(&self) {
		self.cell.update();
	}

	pub fn unmount(&self) {
		self.cell.unmount();
	}

	pub fn phase(&self) -> Phase {
		self.cell.phase()
	}

	pub fn is_mounted(&self) -> bool {
		self.phase() == Phase::Mounted
	}

	pub fn is_first_render(&self) -> bool {
		self.cell.lifecycle.borrow().first_render
	}

	pub fn container(&self) -> Option<Element> {
		self.cell.container()
	}

	pub fn props(&self) -> Ref<'_, C::Props> {
		self.cell.props.borrow()
	}

	pub fn state(&self) -> Ref<'_, C::State> {
		self.cell.state.borrow()
	}

	pub fn set_state<F>(&self, mutate: F)
	where
		F: FnOnce(&mut C::State),
	{
		self.cell.set_state_with(mutate);
	}

	/// Replaces props and schedules an update when they changed.
	pub fn set_props(&self, props: C::Props) {
		self.cell.set_props(props);
	}

	/// Makes `value` available to this component and its descendants.
	pub fn provide<T: 'static>(&self, value: T) {
		self.cell.provided.borrow_mut().own.insert(value);
	}

	pub fn child_count(&self) -> usize {
		self.cell.children.borrow().len()
	}

	pub fn child_keys(&self) -> Vec<String> {
		self.cell.children.borrow().keys()
	}

	/// Number of completed render passes (first render plus updates).
	pub fn render_count(&self) -> u64 {
		self.cell.lifecycle.borrow().renders
	}

	pub fn resource_counts(&self) -> ResourceCounts {
		self.cell.resources.borrow().counts()
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.cell, &other.cell)
	}
}
