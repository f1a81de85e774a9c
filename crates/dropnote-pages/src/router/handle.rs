//! Router access from inside components.

use std::rc::{Rc, Weak};

use super::core::{Router, RouterInner};
use super::route::RouteInfo;
use crate::component::{Component, ComponentError, Context};
use crate::dom::Event;
use crate::warn_log;

/// Weak reference to a router, provided to every route component.
///
/// Holding a handle does not keep the router alive.
#[derive(Clone)]
pub struct RouterHandle {
	inner: Weak<RouterInner>,
}

impl RouterHandle {
	pub(super) fn new(inner: Weak<RouterInner>) -> Self {
		Self { inner }
	}

	/// The router, unless it has been dropped.
	pub fn router(&self) -> Option<Router> {
		self.inner.upgrade().map(Router::from_inner)
	}

	pub fn is_alive(&self) -> bool {
		self.inner.strong_count() > 0
	}
}

impl std::fmt::Debug for RouterHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterHandle")
			.field("alive", &self.is_alive())
			.finish()
	}
}

impl PartialEq for RouterHandle {
	fn eq(&self, other: &Self) -> bool {
		Weak::ptr_eq(&self.inner, &other.inner)
	}
}

/// Navigation helpers for components mounted under a router.
///
/// The router is looked up through [`Context::consume`], so any descendant
/// of a component that provided a [`RouterHandle`] can navigate.
pub trait RouterContextExt {
	fn router(&self) -> Option<Router>;

	/// The route this component was mounted for, falling back to the
	/// router's current route.
	fn route(&self) -> Option<RouteInfo>;

	fn navigate_to(&self, path: &str);

	fn replace_route(&self, path: &str);

	fn go_back(&self);

	/// Routes clicks on `a[data-link]` anchors inside the container through
	/// the router instead of a full page load.
	fn intercept_links(&self) -> Result<(), ComponentError>;
}

impl<C: Component> RouterContextExt for Context<C> {
	fn router(&self) -> Option<Router> {
		self.consume::<RouterHandle>()
			.and_then(|handle| handle.router())
	}

	fn route(&self) -> Option<RouteInfo> {
		match self.consume::<RouteInfo>() {
			Some(route) => Some(RouteInfo::clone(&route)),
			None => self.router().and_then(|router| router.current_route()),
		}
	}

	fn navigate_to(&self, path: &str) {
		match self.router() {
			Some(router) => router.push(path),
			None => warn_log!("{}: no router to navigate to {}", C::name(), path),
		}
	}

	fn replace_route(&self, path: &str) {
		match self.router() {
			Some(router) => router.replace(path),
			None => warn_log!("{}: no router to replace {}", C::name(), path),
		}
	}

	fn go_back(&self) {
		if let Some(router) = self.router() {
			router.back();
		}
	}

	fn intercept_links(&self) -> Result<(), ComponentError> {
		let handle: Rc<RouterHandle> = self
			.consume::<RouterHandle>()
			.ok_or_else(|| ComponentError::hook(C::name(), "no router available"))?;
		self.listen_container("click", move |event: &Event| {
			let Some(target) = event.target() else {
				return;
			};
			let anchor = match target.closest("a[data-link]") {
				Ok(Some(anchor)) => anchor,
				Ok(None) => return,
				Err(err) => {
					warn_log!("link interception failed: {}", err);
					return;
				}
			};
			let Some(href) = anchor.get_attribute("href") else {
				return;
			};
			let Some(router) = handle.router() else {
				return;
			};
			event.prevent_default();
			if anchor.get_attribute("data-replace").is_some() {
				router.redirect(&href);
			} else {
				router.push(&href);
			}
		})
	}
}
