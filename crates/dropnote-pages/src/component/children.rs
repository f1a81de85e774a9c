//! Child registry and type-erased component handles.

use std::any::Any;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use super::{Component, ComponentError, ComponentHandle, ContextMap};
use crate::dom::Element;

/// Object-safe view of a component cell.
pub(crate) trait AnyComponent {
	fn component_name(&self) -> &'static str;

	fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any>;

	fn mount_any(
		self: Rc<Self>,
		container: Element,
		inherited: ContextMap,
	) -> LocalBoxFuture<'static, Result<(), ComponentError>>;

	fn update_any(self: Rc<Self>);

	fn unmount_any(self: Rc<Self>);

	fn is_mounted_any(&self) -> bool;
}

/// Keyed children in declaration order.
#[derive(Default)]
pub(super) struct Children {
	entries: Vec<(String, Rc<dyn AnyComponent>)>,
}

impl Children {
	pub(super) fn get(&self, key: &str) -> Option<Rc<dyn AnyComponent>> {
		self.entries
			.iter()
			.find(|(existing, _)| existing == key)
			.map(|(_, child)| Rc::clone(child))
	}

	pub(super) fn insert(&mut self, key: String, child: Rc<dyn AnyComponent>) {
		match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
			Some((_, slot)) => *slot = child,
			None => self.entries.push((key, child)),
		}
	}

	pub(super) fn remove(&mut self, key: &str) -> Option<Rc<dyn AnyComponent>> {
		let index = self.entries.iter().position(|(existing, _)| existing == key)?;
		Some(self.entries.remove(index).1)
	}

	pub(super) fn take_all(&mut self) -> Vec<(String, Rc<dyn AnyComponent>)> {
		std::mem::take(&mut self.entries)
	}

	pub(super) fn keys(&self) -> Vec<String> {
		self.entries.iter().map(|(key, _)| key.clone()).collect()
	}

	pub(super) fn len(&self) -> usize {
		self.entries.len()
	}
}

/// A component handle with its concrete type erased.
///
/// Route tables produce these so the router can hold whichever page is
/// active.
#[derive(Clone)]
pub struct DynComponent {
	inner: Rc<dyn AnyComponent>,
}

impl DynComponent {
	pub fn new<C: Component>(props: C::Props) -> Self {
		ComponentHandle::<C>::new(props).into()
	}

	pub fn name(&self) -> &'static str {
		self.inner.component_name()
	}

	pub async fn mount(&self, container: &Element) -> Result<(), ComponentError> {
		self.mount_with(container, ContextMap::default()).await
	}

	/// Mounts with `context` visible to [`Context::consume`](super::Context::consume).
	pub async fn mount_with(
		&self,
		container: &Element,
		context: ContextMap,
	) -> Result<(), ComponentError> {
		Rc::clone(&self.inner)
			.mount_any(container.clone(), context)
			.await
	}

	pub fn update(&self) {
		Rc::clone(&self.inner).update_any();
	}

	pub fn unmount(&self) {
		Rc::clone(&self.inner).unmount_any();
	}

	pub fn is_mounted(&self) -> bool {
		self.inner.is_mounted_any()
	}

	/// Recovers the typed handle when the component is a `C`.
	pub fn downcast<C: Component>(&self) -> Option<ComponentHandle<C>> {
		ComponentHandle::from_any(Rc::clone(&self.inner))
	}

	pub fn ptr_eq(&self, other: &DynComponent) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl<C: Component> From<ComponentHandle<C>> for DynComponent {
	fn from(handle: ComponentHandle<C>) -> Self {
		Self {
			inner: handle.into_any(),
		}
	}
}

impl std::fmt::Debug for DynComponent {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DynComponent")
			.field("name", &self.name())
			.field("mounted", &self.is_mounted())
			.finish()
	}
}
