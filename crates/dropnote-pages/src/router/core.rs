//! Core Router Implementation.
//!
//! The router owns one container element and the route table. Every
//! navigation origin (start, push, popstate) funnels into the same
//! resolution pass, and resolutions run one at a time in the order they
//! were requested.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::lock::Mutex;

use super::events::{
	EventCallback, ListenerId, Listeners, RouteChange, RouteFailure, RouterEvent, RouterEventKind,
};
use super::handle::RouterHandle;
use super::history::{History, PopStateSubscription, default_history};
use super::pattern::MatchMode;
use super::query::{parse_query, split_location};
use super::route::{RouteConfig, RouteInfo};
use crate::component::{ComponentError, ContextMap, DynComponent};
use crate::dom::Element;
use crate::{debug_log, info_log, spawn, warn_log};

/// Error type for router operations.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterError {
	/// No route matches the location.
	NoMatchingRoute(String),
	/// A route guard returned an error.
	GuardThrew { path: String, message: String },
	/// The route's component failed to mount.
	MountFailure {
		path: String,
		source: ComponentError,
	},
	/// Invalid route name.
	InvalidRouteName(String),
	/// Missing parameter for reverse URL.
	MissingParameter(String),
	/// The history backend refused an operation.
	History(String),
}

impl std::fmt::Display for RouterError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NoMatchingRoute(path) => write!(f, "No matching route found: {}", path),
			Self::GuardThrew { path, message } => {
				write!(f, "Route guard failed for {}: {}", path, message)
			}
			Self::MountFailure { path, source } => {
				write!(f, "Failed to mount route {}: {}", path, source)
			}
			Self::InvalidRouteName(name) => write!(f, "Invalid route name: {}", name),
			Self::MissingParameter(param) => write!(f, "Missing parameter: {}", param),
			Self::History(msg) => write!(f, "History operation failed: {}", msg),
		}
	}
}

impl std::error::Error for RouterError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::MountFailure { source, .. } => Some(source),
			_ => None,
		}
	}
}

struct ActiveRoute {
	info: RouteInfo,
	component: DynComponent,
}

pub(super) struct RouterInner {
	routes: RefCell<Vec<RouteConfig>>,
	active: RefCell<Option<ActiveRoute>>,
	container: Element,
	history: Rc<dyn History>,
	listeners: RefCell<Listeners>,
	popstate: RefCell<Option<PopStateSubscription>>,
	context: RefCell<ContextMap>,
	destroyed: Cell<bool>,
	navigation: Mutex<()>,
}

impl RouterInner {
	fn find_route(&self, location: &str) -> Option<RouteConfig> {
		let (pathname, _) = split_location(location);
		let routes = self.routes.borrow();
		routes
			.iter()
			.find(|route| route.matches(pathname, MatchMode::Exact))
			.or_else(|| {
				routes
					.iter()
					.find(|route| route.matches(pathname, MatchMode::Prefix))
			})
			.cloned()
	}

	fn current_route(&self) -> Option<RouteInfo> {
		self.active.borrow().as_ref().map(|active| active.info.clone())
	}

	fn emit(&self, event: RouterEvent) {
		if let RouterEvent::RouteError(failure) = &event {
			warn_log!("route error at {}: {}", failure.path, failure.error);
		}
		let callbacks = self.listeners.borrow().snapshot(event.kind());
		for callback in callbacks {
			callback(&event);
		}
	}

	fn emit_error(&self, path: &str, error: RouterError) {
		self.emit(RouterEvent::RouteError(RouteFailure {
			path: path.to_string(),
			error,
		}));
	}

	fn take_active(&self) -> Option<ActiveRoute> {
		self.active.borrow_mut().take()
	}
}

/// Runs one resolution pass for `location`.
async fn resolve_location(inner: Rc<RouterInner>, location: String) {
	let _serialized = inner.navigation.lock().await;
	if inner.destroyed.get() {
		debug_log!("router destroyed, dropping navigation to {}", location);
		return;
	}

	let Some(route) = inner.find_route(&location) else {
		inner.emit_error(&location, RouterError::NoMatchingRoute(location.clone()));
		return;
	};

	let to = route.route_info(&location);
	let from = inner.current_route();
	inner.emit(RouterEvent::BeforeRouteChange(RouteChange {
		to: to.clone(),
		from: from.clone(),
	}));

	if let Some(guard) = route.guard() {
		match guard(to.clone(), from.clone().unwrap_or_default()).await {
			Ok(true) => {}
			Ok(false) => {
				debug_log!("guard rejected navigation to {}", location);
				return;
			}
			Err(err) => {
				inner.emit_error(
					&location,
					RouterError::GuardThrew {
						path: location.clone(),
						message: err.to_string(),
					},
				);
				return;
			}
		}
		if inner.destroyed.get() {
			return;
		}
	}

	if let Some(previous) = inner.take_active() {
		previous.component.unmount();
	}

	let component = route.instantiate();
	let mut context = inner.context.borrow().clone();
	context.insert(RouterHandle::new(Rc::downgrade(&inner)));
	context.insert(to.clone());

	match component.mount_with(&inner.container, context).await {
		Ok(()) if inner.destroyed.get() => component.unmount(),
		Ok(()) => {
			*inner.active.borrow_mut() = Some(ActiveRoute {
				info: to.clone(),
				component,
			});
			info_log!("navigated to {}", location);
			inner.emit(RouterEvent::AfterRouteChange(RouteChange { to, from }));
		}
		Err(source) => {
			inner.emit_error(
				&location,
				RouterError::MountFailure {
					path: location.clone(),
					source,
				},
			);
		}
	}
}

/// The main router.
///
/// Clones share the same route table, history and active component.
#[derive(Clone)]
pub struct Router {
	inner: Rc<RouterInner>,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("routes_count", &self.inner.routes.borrow().len())
			.field("current_path", &self.current_path())
			.field(
				"active",
				&self.inner.active.borrow().as_ref().map(|a| a.info.path.clone()),
			)
			.field("destroyed", &self.inner.destroyed.get())
			.finish()
	}
}

impl Router {
	/// Creates a router bound to `container` using the default history.
	pub fn new(container: Element) -> Self {
		Self::with_history(container, default_history())
	}

	pub fn with_history(container: Element, history: Rc<dyn History>) -> Self {
		Self {
			inner: Rc::new(RouterInner {
				routes: RefCell::new(Vec::new()),
				active: RefCell::new(None),
				container,
				history,
				listeners: RefCell::new(Listeners::default()),
				popstate: RefCell::new(None),
				context: RefCell::new(ContextMap::new()),
				destroyed: Cell::new(false),
				navigation: Mutex::new(()),
			}),
		}
	}

	/// Values every route component can consume, alongside the router
	/// handle and its own [`RouteInfo`].
	pub fn with_context(self, context: ContextMap) -> Self {
		self.inner.context.borrow_mut().extend(&context);
		self
	}

	pub fn provide<T: 'static>(&self, value: T) {
		self.inner.context.borrow_mut().insert(value);
	}

	pub fn add_route(&self, route: RouteConfig) {
		self.inner.routes.borrow_mut().push(route);
	}

	pub fn add_routes(&self, routes: impl IntoIterator<Item = RouteConfig>) {
		self.inner.routes.borrow_mut().extend(routes);
	}

	pub fn route_count(&self) -> usize {
		self.inner.routes.borrow().len()
	}

	pub fn has_route(&self, name: &str) -> bool {
		self.inner
			.routes
			.borrow()
			.iter()
			.any(|route| route.name() == Some(name))
	}

	/// Route information `location` would resolve to, without navigating.
	///
	/// Exact matches win over prefix matches; within each pass the first
	/// registered route wins.
	pub fn match_route(&self, location: &str) -> Option<RouteInfo> {
		self.inner
			.find_route(location)
			.map(|route| route.route_info(location))
	}

	/// Subscribes to popstate and resolves the current location.
	pub fn start(&self) {
		if self.inner.destroyed.get() {
			warn_log!("start() called on a destroyed router");
			return;
		}
		if self.inner.popstate.borrow().is_none() {
			let weak = Rc::downgrade(&self.inner);
			let subscription = self.inner.history.subscribe(Rc::new(move || {
				let Some(inner) = weak.upgrade() else {
					return;
				};
				if inner.destroyed.get() {
					return;
				}
				let location = inner.history.location();
				spawn::spawn_local(resolve_location(inner, location));
			}));
			*self.inner.popstate.borrow_mut() = Some(subscription);
		}
		self.spawn_resolution(self.current_path());
	}

	/// Resolves the current location and waits for the pass to finish.
	pub async fn resolve(&self) {
		resolve_location(Rc::clone(&self.inner), self.current_path()).await;
	}

	fn spawn_resolution(&self, location: String) {
		spawn::spawn_local(resolve_location(Rc::clone(&self.inner), location));
	}

	/// Adds `path` to history when it differs from the current location,
	/// then resolves it.
	///
	/// Failures are reported through [`RouterEventKind::RouteError`].
	pub fn push(&self, path: &str) {
		if self.push_history(path) {
			self.spawn_resolution(path.to_string());
		}
	}

	/// [`push`](Self::push), waiting for the resolution to finish.
	///
	/// Must not be awaited from a route component's `mounted` hook: that
	/// resolution is still holding the navigation lock.
	pub async fn navigate(&self, path: &str) {
		if self.push_history(path) {
			resolve_location(Rc::clone(&self.inner), path.to_string()).await;
		}
	}

	fn push_history(&self, path: &str) -> bool {
		if self.inner.destroyed.get() {
			warn_log!("ignoring navigation to {} on a destroyed router", path);
			return false;
		}
		if self.inner.history.location() == path {
			return false;
		}
		match self.inner.history.push_state(path) {
			Ok(()) => true,
			Err(err) => {
				self.inner.emit_error(path, err);
				false
			}
		}
	}

	/// Overwrites the current history entry. The active route and
	/// component are left as they are.
	pub fn replace(&self, path: &str) {
		if self.inner.destroyed.get() {
			return;
		}
		if let Err(err) = self.inner.history.replace_state(path) {
			self.inner.emit_error(path, err);
		}
	}

	/// Overwrites the current history entry and resolves it.
	pub fn redirect(&self, path: &str) {
		if self.inner.destroyed.get() {
			return;
		}
		match self.inner.history.replace_state(path) {
			Ok(()) => self.spawn_resolution(path.to_string()),
			Err(err) => self.inner.emit_error(path, err),
		}
	}

	pub fn back(&self) {
		self.go(-1);
	}

	pub fn forward(&self) {
		self.go(1);
	}

	/// Moves through history; the resulting popstate resolves the new
	/// location.
	pub fn go(&self, delta: i32) {
		if self.inner.destroyed.get() {
			return;
		}
		self.inner.history.go(delta);
	}

	pub fn on<F>(&self, kind: RouterEventKind, callback: F) -> ListenerId
	where
		F: Fn(&RouterEvent) + 'static,
	{
		let callback: EventCallback = Rc::new(callback);
		self.inner.listeners.borrow_mut().add(kind, callback)
	}

	pub fn off(&self, id: ListenerId) -> bool {
		self.inner.listeners.borrow_mut().remove(id)
	}

	pub fn on_before_change<F>(&self, callback: F) -> ListenerId
	where
		F: Fn(&RouteChange) + 'static,
	{
		self.on(RouterEventKind::BeforeRouteChange, move |event| {
			if let RouterEvent::BeforeRouteChange(change) = event {
				callback(change);
			}
		})
	}

	pub fn on_after_change<F>(&self, callback: F) -> ListenerId
	where
		F: Fn(&RouteChange) + 'static,
	{
		self.on(RouterEventKind::AfterRouteChange, move |event| {
			if let RouterEvent::AfterRouteChange(change) = event {
				callback(change);
			}
		})
	}

	pub fn on_error<F>(&self, callback: F) -> ListenerId
	where
		F: Fn(&RouteFailure) + 'static,
	{
		self.on(RouterEventKind::RouteError, move |event| {
			if let RouterEvent::RouteError(failure) = event {
				callback(failure);
			}
		})
	}

	/// The last successfully resolved route.
	pub fn current_route(&self) -> Option<RouteInfo> {
		self.inner.current_route()
	}

	pub fn current_component(&self) -> Option<DynComponent> {
		self.inner
			.active
			.borrow()
			.as_ref()
			.map(|active| active.component.clone())
	}

	/// Pathname plus query string of the current history entry.
	pub fn current_path(&self) -> String {
		self.inner.history.location()
	}

	pub fn query_params(&self) -> HashMap<String, String> {
		let location = self.current_path();
		parse_query(split_location(&location).1)
	}

	/// Builds the path of the route named `name`.
	pub fn reverse(
		&self,
		name: &str,
		params: &HashMap<String, String>,
	) -> Result<String, RouterError> {
		let routes = self.inner.routes.borrow();
		let route = routes
			.iter()
			.find(|route| route.name() == Some(name))
			.ok_or_else(|| RouterError::InvalidRouteName(name.to_string()))?;
		route.pattern().reverse(params)
	}

	pub fn handle(&self) -> RouterHandle {
		RouterHandle::new(Rc::downgrade(&self.inner))
	}

	pub(super) fn from_inner(inner: Rc<RouterInner>) -> Self {
		Self { inner }
	}

	/// Unmounts the active component and stops listening for popstate.
	///
	/// The router ignores every later navigation request.
	pub fn destroy(&self) {
		if self.inner.destroyed.replace(true) {
			return;
		}
		if let Some(active) = self.inner.take_active() {
			active.component.unmount();
		}
		self.inner.popstate.borrow_mut().take();
		self.inner.listeners.borrow_mut().clear();
		info_log!("router destroyed");
	}

	pub fn is_destroyed(&self) -> bool {
		self.inner.destroyed.get()
	}

	pub fn container(&self) -> &Element {
		&self.inner.container
	}

	pub fn ptr_eq(&self, other: &Router) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use crate::component::{Component, Context};
	use crate::router::MemoryHistory;
	use async_trait::async_trait;
	use rstest::rstest;
	use std::error::Error as _;

	struct Page;

	#[async_trait(?Send)]
	impl Component for Page {
		type Props = ();
		type State = ();

		fn create(_props: &()) -> Self {
			Page
		}

		fn template(&self, _ctx: &Context<Self>) -> String {
			"<p>page</p>".to_string()
		}
	}

	fn router() -> Router {
		let router = Router::with_history(Element::new("div"), Rc::new(MemoryHistory::new("/")));
		router.add_routes([
			RouteConfig::new::<Page>("/").exact(true).named("MainPage"),
			RouteConfig::new::<Page>("/list").named("ListPage"),
			RouteConfig::new::<Page>("/detail/:id").named("DetailPage"),
			RouteConfig::new::<Page>("/detail"),
		]);
		router
	}

	#[rstest]
	#[case("/", Some("MainPage"))]
	#[case("/list?page=2", Some("ListPage"))]
	#[case("/list/2", Some("ListPage"))]
	#[case("/detail/42", Some("DetailPage"))]
	#[case("/detail/42/extra", Some("DetailPage"))]
	#[case("/about", None)]
	fn test_match_route_prefers_exact_then_prefix(
		#[case] location: &str,
		#[case] expected: Option<&str>,
	) {
		// Act
		let matched = router().match_route(location);

		// Assert
		assert_eq!(matched.and_then(|info| info.name), expected.map(String::from));
	}

	#[rstest]
	fn test_exact_match_beats_earlier_prefix_match() {
		// Arrange
		let router = router();

		// Act
		let matched = router.match_route("/detail").unwrap();

		// Assert
		assert_eq!(matched.name, None);
		assert_eq!(matched.path, "/detail");
	}

	#[rstest]
	fn test_reverse_named_route() {
		// Arrange
		let router = router();
		let params = HashMap::from([("id".to_string(), "7".to_string())]);

		// Act
		let path = router.reverse("DetailPage", &params);
		let unknown = router.reverse("Nope", &params);

		// Assert
		assert_eq!(path, Ok("/detail/7".to_string()));
		assert_eq!(unknown, Err(RouterError::InvalidRouteName("Nope".to_string())));
	}

	#[rstest]
	fn test_mount_failure_exposes_component_error_as_source() {
		// Arrange
		let error = RouterError::MountFailure {
			path: "/list".to_string(),
			source: ComponentError::ContainerMissing {
				selector: "#missing".to_string(),
			},
		};

		// Act
		let message = error.to_string();
		let source = error.source().map(|source| source.to_string());

		// Assert
		assert_eq!(
			message,
			"Failed to mount route /list: container not found: #missing"
		);
		assert_eq!(source.as_deref(), Some("container not found: #missing"));
	}

	#[rstest]
	fn test_has_route_and_count() {
		// Arrange
		let router = router();

		// Act & Assert
		assert_eq!(router.route_count(), 4);
		assert!(router.has_route("ListPage"));
		assert!(!router.has_route("ContactPage"));
	}
}
