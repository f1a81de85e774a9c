//! Route table entries and resolved route information.

use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::params::{FromPath, PathError};
use super::pattern::{MatchMode, PathPattern};
use super::query::{parse_query, split_location};
use crate::component::{Component, DynComponent};

/// A resolved navigation target.
///
/// `RouteInfo::default()` is the empty placeholder handed to guards as
/// `from` on the first navigation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteInfo {
	/// Pathname without the query string.
	pub path: String,
	pub params: HashMap<String, String>,
	pub query: HashMap<String, String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	pub meta: Map<String, Value>,
}

impl RouteInfo {
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	pub fn query_value(&self, key: &str) -> Option<&str> {
		self.query.get(key).map(String::as_str)
	}

	/// Parses the path parameter `name`.
	pub fn param_as<T: FromPath>(&self, name: &str) -> Result<T, PathError> {
		let raw = self
			.param(name)
			.ok_or_else(|| PathError::Missing(name.to_string()))?;
		T::from_path(name, raw)
	}

	/// Parses the query value under `key`.
	pub fn query_as<T: FromPath>(&self, key: &str) -> Result<T, PathError> {
		let raw = self
			.query_value(key)
			.ok_or_else(|| PathError::Missing(key.to_string()))?;
		T::from_path(key, raw)
	}
}

/// Failure reported by a route guard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct GuardError(pub String);

impl GuardError {
	pub fn new(message: impl std::fmt::Display) -> Self {
		Self(message.to_string())
	}
}

/// Async predicate run before a route is entered: `(to, from)`.
pub(super) type RouteGuard =
	Rc<dyn Fn(RouteInfo, RouteInfo) -> LocalBoxFuture<'static, Result<bool, GuardError>>>;

type ComponentFactory = Rc<dyn Fn() -> DynComponent>;

/// One entry of the route table.
#[derive(Clone)]
pub struct RouteConfig {
	pattern: PathPattern,
	factory: ComponentFactory,
	name: Option<String>,
	meta: Map<String, Value>,
	exact: bool,
	guard: Option<RouteGuard>,
}

impl std::fmt::Debug for RouteConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteConfig")
			.field("pattern", &self.pattern)
			.field("name", &self.name)
			.field("exact", &self.exact)
			.field("has_guard", &self.guard.is_some())
			.finish()
	}
}

impl RouteConfig {
	/// Routes `path` to a `C` built from default props.
	pub fn new<C>(path: &str) -> Self
	where
		C: Component,
		C::Props: Default,
	{
		Self::with_factory(path, || DynComponent::new::<C>(C::Props::default()))
	}

	/// Routes `path` to a `C` built from a clone of `props`.
	pub fn with_props<C: Component>(path: &str, props: C::Props) -> Self {
		Self::with_factory(path, move || DynComponent::new::<C>(props.clone()))
	}

	/// Routes `path` to whatever `factory` builds on each navigation.
	pub fn with_factory<F>(path: &str, factory: F) -> Self
	where
		F: Fn() -> DynComponent + 'static,
	{
		Self {
			pattern: PathPattern::new(path),
			factory: Rc::new(factory),
			name: None,
			meta: Map::new(),
			exact: false,
			guard: None,
		}
	}

	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.meta.insert(key.into(), value.into());
		self
	}

	/// An exact route never matches by prefix.
	pub fn exact(mut self, exact: bool) -> Self {
		self.exact = exact;
		self
	}

	/// Installs an async guard called with `(to, from)` before the route's
	/// component is mounted.
	///
	/// `Ok(false)` aborts the navigation silently; `Err` aborts it and is
	/// reported as a route error.
	pub fn before_enter<G, Fut>(mut self, guard: G) -> Self
	where
		G: Fn(RouteInfo, RouteInfo) -> Fut + 'static,
		Fut: Future<Output = Result<bool, GuardError>> + 'static,
	{
		self.guard = Some(Rc::new(move |to, from| guard(to, from).boxed_local()));
		self
	}

	pub fn path(&self) -> &str {
		self.pattern.pattern()
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn meta(&self) -> &Map<String, Value> {
		&self.meta
	}

	pub fn is_exact(&self) -> bool {
		self.exact
	}

	pub fn has_guard(&self) -> bool {
		self.guard.is_some()
	}

	pub fn pattern(&self) -> &PathPattern {
		&self.pattern
	}

	pub(super) fn matches(&self, pathname: &str, mode: MatchMode) -> bool {
		match mode {
			MatchMode::Prefix if self.exact => false,
			_ => self.pattern.matches(pathname, mode),
		}
	}

	/// Route information for `location` (pathname plus optional query).
	pub(super) fn route_info(&self, location: &str) -> RouteInfo {
		let (pathname, search) = split_location(location);
		RouteInfo {
			path: pathname.to_string(),
			params: self.pattern.extract_params(pathname),
			query: parse_query(search),
			name: self.name.clone(),
			meta: self.meta.clone(),
		}
	}

	pub(super) fn instantiate(&self) -> DynComponent {
		(self.factory)()
	}

	pub(super) fn guard(&self) -> Option<RouteGuard> {
		self.guard.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::component::Context;
	use async_trait::async_trait;
	use rstest::rstest;

	struct Blank;

	#[async_trait(?Send)]
	impl Component for Blank {
		type Props = ();
		type State = ();

		fn create(_props: &()) -> Self {
			Blank
		}

		fn template(&self, _ctx: &Context<Self>) -> String {
			String::new()
		}
	}

	#[rstest]
	fn test_route_info_collects_params_query_and_meta() {
		// Arrange
		let route = RouteConfig::new::<Blank>("/detail/:id")
			.named("Detail")
			.with_meta("requires_auth", true);

		// Act
		let info = route.route_info("/detail/42?tab=raw&tab=html");

		// Assert
		assert_eq!(info.path, "/detail/42");
		assert_eq!(info.param("id"), Some("42"));
		assert_eq!(info.query_value("tab"), Some("html"));
		assert_eq!(info.name.as_deref(), Some("Detail"));
		assert_eq!(info.meta.get("requires_auth"), Some(&Value::Bool(true)));
	}

	#[rstest]
	fn test_param_as_parses_and_reports_missing() {
		// Arrange
		let info = RouteConfig::new::<Blank>("/detail/:id").route_info("/detail/7?page=x");

		// Act
		let id: Result<u64, _> = info.param_as("id");
		let missing: Result<u64, _> = info.param_as("slug");
		let page: Result<u32, _> = info.query_as("page");

		// Assert
		assert_eq!(id, Ok(7));
		assert_eq!(missing, Err(PathError::Missing("slug".to_string())));
		assert!(matches!(page, Err(PathError::ParseError { .. })));
	}

	#[rstest]
	#[case(false, MatchMode::Prefix, true)]
	#[case(true, MatchMode::Prefix, false)]
	#[case(true, MatchMode::Exact, false)]
	fn test_exact_routes_skip_prefix_pass(
		#[case] exact: bool,
		#[case] mode: MatchMode,
		#[case] expected: bool,
	) {
		// Arrange
		let route = RouteConfig::new::<Blank>("/list").exact(exact);

		// Act
		let matched = route.matches("/list/2", mode);

		// Assert
		assert_eq!(matched, expected);
	}

	#[rstest]
	fn test_placeholder_route_serializes_without_name() {
		// Act
		let json = serde_json::to_value(RouteInfo::default()).unwrap();

		// Assert
		assert_eq!(
			json,
			serde_json::json!({ "path": "", "params": {}, "query": {}, "meta": {} })
		);
	}
}
