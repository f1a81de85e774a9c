//! Context values shared down the component tree.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

/// Type-keyed values visible to a component and its descendants.
///
/// The router publishes a [`RouterHandle`](crate::router::RouterHandle)
/// here; applications add their own services the same way.
#[derive(Clone, Default)]
pub struct ContextMap {
	entries: HashMap<TypeId, Rc<dyn Any>>,
}

impl ContextMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `value`, replacing any previous value of the same type.
	pub fn insert<T: 'static>(&mut self, value: T) {
		self.entries.insert(TypeId::of::<T>(), Rc::new(value));
	}

	pub fn get<T: 'static>(&self) -> Option<Rc<T>> {
		self.entries
			.get(&TypeId::of::<T>())
			.cloned()
			.and_then(|value| value.downcast::<T>().ok())
	}

	pub fn contains<T: 'static>(&self) -> bool {
		self.entries.contains_key(&TypeId::of::<T>())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Copies every entry of `other` into `self`, overriding on conflict.
	pub fn extend(&mut self, other: &ContextMap) {
		for (key, value) in &other.entries {
			self.entries.insert(*key, Rc::clone(value));
		}
	}
}

impl std::fmt::Debug for ContextMap {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ContextMap")
			.field("len", &self.entries.len())
			.finish()
	}
}

/// A component's own provisions plus what it inherited on mount.
#[derive(Default)]
pub(super) struct Provided {
	pub(super) own: ContextMap,
	pub(super) inherited: ContextMap,
}

impl Provided {
	pub(super) fn get<T: 'static>(&self) -> Option<Rc<T>> {
		self.own.get::<T>().or_else(|| self.inherited.get::<T>())
	}

	/// The map handed to children mounted under this component.
	pub(super) fn for_children(&self) -> ContextMap {
		let mut map = self.inherited.clone();
		map.extend(&self.own);
		map
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[derive(Debug, PartialEq)]
	struct Theme(&'static str);

	#[rstest]
	fn test_own_values_shadow_inherited_ones() {
		// Arrange
		let mut provided = Provided::default();
		provided.inherited.insert(Theme("light"));
		provided.inherited.insert(42_u32);

		// Act
		provided.own.insert(Theme("dark"));
		let for_children = provided.for_children();

		// Assert
		assert_eq!(provided.get::<Theme>().as_deref(), Some(&Theme("dark")));
		assert_eq!(for_children.get::<Theme>().as_deref(), Some(&Theme("dark")));
		assert_eq!(for_children.get::<u32>().as_deref(), Some(&42));
	}

	#[rstest]
	fn test_missing_type_is_none() {
		// Arrange
		let map = ContextMap::new();

		// Assert
		assert!(map.get::<Theme>().is_none());
		assert!(!map.contains::<Theme>());
		assert!(map.is_empty());
	}
}
