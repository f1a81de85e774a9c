//! Integration tests for router navigation
//!
//! These tests drive a [`Router`] over an in-memory history:
//! 1. Initial resolution and route events
//! 2. Failures reported through the route error channel
//! 3. Guards
//! 4. History traversal, replace and destroy
//! 5. Serialized navigations
//! 6. Components navigating through their context

use std::cell::RefCell;
use std::rc::Rc;

use dropnote_pages::async_trait;
use dropnote_pages::component::{Component, ComponentError, Context};
use dropnote_pages::dom::Element;
use dropnote_pages::router::{
	GuardError, History, Link, MemoryHistory, RouteConfig, Router, RouterContextExt, RouterError,
	RouterEvent, RouterEventKind,
};
use dropnote_pages::spawn::run_until_stalled;
use futures::channel::oneshot;
use rstest::*;

// ============================================================================
// Route components
// ============================================================================

struct Home;

#[async_trait(?Send)]
impl Component for Home {
	type Props = ();
	type State = ();

	fn create(_props: &()) -> Self {
		Home
	}

	fn template(&self, _ctx: &Context<Self>) -> String {
		format!(
			"<h1>home</h1>{}{}",
			Link::new("/list?page=2", "List").render(),
			Link::new("/detail/9", "Nine").replace(true).render()
		)
	}

	fn bind_events(&self, ctx: &Context<Self>) {
		let _ = ctx.intercept_links();
	}
}

struct ListPage;

#[async_trait(?Send)]
impl Component for ListPage {
	type Props = ();
	type State = ();

	fn create(_props: &()) -> Self {
		ListPage
	}

	fn template(&self, ctx: &Context<Self>) -> String {
		let page = ctx
			.route()
			.and_then(|route| route.query_as::<u32>("page").ok())
			.unwrap_or(1);
		format!(r#"<ul data-page="{}"></ul>"#, page)
	}
}

struct Detail;

#[async_trait(?Send)]
impl Component for Detail {
	type Props = ();
	type State = ();

	fn create(_props: &()) -> Self {
		Detail
	}

	fn template(&self, ctx: &Context<Self>) -> String {
		let id = ctx
			.route()
			.and_then(|route| route.param("id").map(str::to_string))
			.unwrap_or_default();
		format!(r#"<article id="detail-{}"></article>"#, id)
	}
}

struct Crashing;

#[async_trait(?Send)]
impl Component for Crashing {
	type Props = ();
	type State = ();

	fn create(_props: &()) -> Self {
		Crashing
	}

	fn template(&self, _ctx: &Context<Self>) -> String {
		"<p>crash</p>".to_string()
	}

	async fn mounted(&self, _ctx: &Context<Self>) -> Result<(), ComponentError> {
		Err(ComponentError::hook(Self::name(), "boom"))
	}
}

// ============================================================================
// Fixtures
// ============================================================================

struct Harness {
	router: Router,
	history: MemoryHistory,
	outlet: Element,
	log: Rc<RefCell<Vec<String>>>,
}

impl Harness {
	fn log(&self) -> Vec<String> {
		self.log.borrow().clone()
	}

	fn clear_log(&self) {
		self.log.borrow_mut().clear();
	}
}

#[fixture]
fn harness() -> Harness {
	let history = MemoryHistory::new("/");
	let outlet = Element::new("main");
	let router = Router::with_history(outlet.clone(), Rc::new(history.clone()));
	router.add_routes([
		RouteConfig::new::<Home>("/").exact(true).named("Home"),
		RouteConfig::new::<ListPage>("/list").named("List"),
		RouteConfig::new::<Detail>("/detail/:id").named("Detail"),
		RouteConfig::new::<Crashing>("/crash"),
		RouteConfig::new::<Detail>("/locked").before_enter(|_to, _from| async { Ok(false) }),
		RouteConfig::new::<Detail>("/broken-guard")
			.before_enter(|_to, _from| async { Err(GuardError::new("session lookup failed")) }),
	]);

	let log = Rc::new(RefCell::new(Vec::new()));
	for kind in [
		RouterEventKind::BeforeRouteChange,
		RouterEventKind::AfterRouteChange,
		RouterEventKind::RouteError,
	] {
		let log = Rc::clone(&log);
		router.on(kind, move |event| {
			let entry = match event {
				RouterEvent::BeforeRouteChange(change) => format!("before:{}", change.to.path),
				RouterEvent::AfterRouteChange(change) => format!("after:{}", change.to.path),
				RouterEvent::RouteError(failure) => format!("error:{}", failure.path),
			};
			log.borrow_mut().push(entry);
		});
	}

	Harness {
		router,
		history,
		outlet,
		log,
	}
}

fn started(harness: Harness) -> Harness {
	harness.router.start();
	run_until_stalled();
	harness.clear_log();
	harness
}

// ============================================================================
// Category 1: Resolution
// ============================================================================

/// start() resolves the current location and emits before/after once
#[rstest]
fn test_start_mounts_initial_route(harness: Harness) {
	// Act
	harness.router.start();
	run_until_stalled();

	// Assert
	assert_eq!(harness.log(), vec!["before:/", "after:/"]);
	let route = harness.router.current_route().unwrap();
	assert_eq!(route.name.as_deref(), Some("Home"));
	assert!(harness.outlet.inner_html().starts_with("<h1>home</h1>"));
	assert!(harness.router.current_component().unwrap().is_mounted());
}

/// Params and query reach the mounted component through its context
#[rstest]
fn test_push_passes_params_and_query(harness: Harness) {
	// Arrange
	let harness = started(harness);

	// Act
	harness.router.push("/detail/42?tab=raw");
	run_until_stalled();

	// Assert
	let route = harness.router.current_route().unwrap();
	assert_eq!(route.param("id"), Some("42"));
	assert_eq!(route.query_value("tab"), Some("raw"));
	assert_eq!(harness.outlet.inner_html(), r#"<article id="detail-42"></article>"#);
	assert_eq!(harness.router.current_path(), "/detail/42?tab=raw");
	assert_eq!(harness.router.query_params().get("tab").map(String::as_str), Some("raw"));
}

/// The previous page is unmounted before the next one mounts
#[rstest]
fn test_navigation_replaces_active_component(harness: Harness) {
	// Arrange
	let harness = started(harness);
	let home = harness.router.current_component().unwrap();

	// Act
	harness.router.push("/list");
	run_until_stalled();

	// Assert
	assert!(!home.is_mounted());
	let list = harness.router.current_component().unwrap();
	assert!(list.downcast::<ListPage>().is_some());
	assert_eq!(harness.outlet.inner_html(), r#"<ul data-page="1"></ul>"#);
	assert_eq!(harness.log(), vec!["before:/list", "after:/list"]);
}

// ============================================================================
// Category 2: Failures
// ============================================================================

/// An unregistered path emits one error and changes nothing
#[rstest]
fn test_unmatched_path_reports_error(harness: Harness) {
	// Arrange
	let harness = started(harness);
	let home = harness.router.current_component().unwrap();
	let errors = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&errors);
	harness
		.router
		.on_error(move |failure| sink.borrow_mut().push(failure.error.clone()));

	// Act
	harness.router.push("/nowhere");
	run_until_stalled();

	// Assert
	assert_eq!(harness.log(), vec!["error:/nowhere"]);
	assert_eq!(
		*errors.borrow(),
		vec![RouterError::NoMatchingRoute("/nowhere".to_string())]
	);
	assert_eq!(harness.router.current_route().unwrap().path, "/");
	assert!(harness.router.current_component().unwrap().ptr_eq(&home));
	assert!(home.is_mounted());
}

/// A failing mount clears both the route and the component
#[rstest]
fn test_mount_failure_resets_state(harness: Harness) {
	// Arrange
	let harness = started(harness);
	let errors = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&errors);
	harness
		.router
		.on_error(move |failure| sink.borrow_mut().push(failure.error.clone()));

	// Act
	harness.router.push("/crash");
	run_until_stalled();

	// Assert
	assert_eq!(harness.log(), vec!["before:/crash", "error:/crash"]);
	assert!(matches!(
		errors.borrow().as_slice(),
		[RouterError::MountFailure { path, .. }] if path == "/crash"
	));
	assert!(harness.router.current_route().is_none());
	assert!(harness.router.current_component().is_none());
	assert_eq!(harness.outlet.inner_html(), "");
}

// ============================================================================
// Category 3: Guards
// ============================================================================

/// A guard returning false keeps the current page mounted
#[rstest]
fn test_guard_rejection_keeps_current_page(harness: Harness) {
	// Arrange
	let harness = started(harness);
	let home = harness.router.current_component().unwrap();

	// Act
	harness.router.push("/locked");
	run_until_stalled();

	// Assert
	assert_eq!(harness.log(), vec!["before:/locked"]);
	assert!(home.is_mounted());
	assert!(harness.router.current_component().unwrap().ptr_eq(&home));
	assert_eq!(harness.router.current_route().unwrap().path, "/");
}

/// A guard error is reported and the navigation is abandoned
#[rstest]
fn test_guard_error_is_reported(harness: Harness) {
	// Arrange
	let harness = started(harness);
	let errors = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&errors);
	harness
		.router
		.on_error(move |failure| sink.borrow_mut().push(failure.error.clone()));

	// Act
	harness.router.push("/broken-guard");
	run_until_stalled();

	// Assert
	assert_eq!(
		*errors.borrow(),
		vec![RouterError::GuardThrew {
			path: "/broken-guard".to_string(),
			message: "session lookup failed".to_string(),
		}]
	);
	assert_eq!(harness.router.current_route().unwrap().path, "/");
}

/// Guards see the placeholder route as `from` on the first navigation
#[rstest]
fn test_guard_receives_placeholder_from() {
	// Arrange
	let seen = Rc::new(RefCell::new(None));
	let sink = Rc::clone(&seen);
	let router = Router::with_history(Element::new("main"), Rc::new(MemoryHistory::new("/list")));
	router.add_route(RouteConfig::new::<ListPage>("/list").before_enter(move |to, from| {
		*sink.borrow_mut() = Some((to.path.clone(), from.clone()));
		async { Ok(true) }
	}));

	// Act
	router.start();
	run_until_stalled();

	// Assert
	let (to, from) = seen.borrow().clone().unwrap();
	assert_eq!(to, "/list");
	assert_eq!(from, Default::default());
	assert!(router.current_component().is_some());
}

// ============================================================================
// Category 4: History
// ============================================================================

/// Pushing the current location does nothing
#[rstest]
fn test_push_same_location_is_noop(harness: Harness) {
	// Arrange
	let harness = started(harness);

	// Act
	harness.router.push("/");
	run_until_stalled();

	// Assert
	assert!(harness.log().is_empty());
	assert_eq!(harness.history.len(), 1);
}

/// back() re-resolves through popstate
#[rstest]
fn test_back_resolves_previous_entry(harness: Harness) {
	// Arrange
	let harness = started(harness);
	harness.router.push("/list");
	run_until_stalled();
	harness.clear_log();

	// Act
	harness.router.back();
	run_until_stalled();

	// Assert
	assert_eq!(harness.log(), vec!["before:/", "after:/"]);
	assert_eq!(harness.router.current_route().unwrap().path, "/");
	harness.router.forward();
	run_until_stalled();
	assert_eq!(harness.router.current_route().unwrap().path, "/list");
}

/// replace() rewrites history without touching the active route
#[rstest]
fn test_replace_leaves_route_untouched(harness: Harness) {
	// Arrange
	let harness = started(harness);

	// Act
	harness.router.replace("/list");
	run_until_stalled();

	// Assert
	assert_eq!(harness.history.entries(), vec!["/list"]);
	assert_eq!(harness.router.current_route().unwrap().path, "/");
	assert!(harness.log().is_empty());
}

/// A destroyed router unmounts its page and ignores navigation
#[rstest]
fn test_destroy_makes_router_inert(harness: Harness) {
	// Arrange
	let harness = started(harness);
	let home = harness.router.current_component().unwrap();

	// Act
	harness.router.destroy();
	harness.router.push("/list");
	harness.history.push_state("/detail/1").unwrap();
	harness.history.go(-1);
	run_until_stalled();

	// Assert
	assert!(harness.router.is_destroyed());
	assert!(!home.is_mounted());
	assert!(harness.router.current_component().is_none());
	assert_eq!(harness.outlet.inner_html(), "");
	assert_eq!(harness.history.listener_count(), 0);
	assert!(harness.log().is_empty());
}

// ============================================================================
// Category 5: Serialization and listeners
// ============================================================================

/// A second navigation waits for the first one's guard
#[rstest]
fn test_navigations_resolve_in_request_order(harness: Harness) {
	// Arrange
	let (release, gate) = oneshot::channel::<bool>();
	let gate = Rc::new(RefCell::new(Some(gate)));
	harness.router.add_route(RouteConfig::new::<Detail>("/slow").before_enter(
		move |_to, _from| {
			let gate = gate.borrow_mut().take();
			async move {
				match gate {
					Some(gate) => gate.await.map_err(GuardError::new),
					None => Ok(true),
				}
			}
		},
	));
	let harness = started(harness);

	// Act
	harness.router.push("/slow");
	harness.router.push("/list");
	run_until_stalled();
	let while_pending = harness.log();
	release.send(true).unwrap();
	run_until_stalled();

	// Assert
	assert_eq!(while_pending, vec!["before:/slow"]);
	assert_eq!(
		harness.log(),
		vec!["before:/slow", "after:/slow", "before:/list", "after:/list"]
	);
	assert_eq!(harness.router.current_route().unwrap().path, "/list");
}

/// off() stops delivery to that listener only
#[rstest]
fn test_off_removes_listener(harness: Harness) {
	// Arrange
	let harness = started(harness);
	let hits = Rc::new(RefCell::new(0));
	let counter = Rc::clone(&hits);
	let id = harness
		.router
		.on_after_change(move |_| *counter.borrow_mut() += 1);

	// Act
	assert!(harness.router.off(id));
	harness.router.push("/list");
	run_until_stalled();

	// Assert
	assert_eq!(*hits.borrow(), 0);
	assert_eq!(harness.log(), vec!["before:/list", "after:/list"]);
	assert!(!harness.router.off(id));
}

// ============================================================================
// Category 6: Navigation from components
// ============================================================================

/// Clicking a data-link anchor pushes through the router
#[rstest]
fn test_intercepted_link_pushes(harness: Harness) {
	// Arrange
	let harness = started(harness);
	let anchor = harness
		.outlet
		.query_selector(r#"a[href="/list?page=2"]"#)
		.unwrap()
		.unwrap();

	// Act
	let event = anchor.click();
	run_until_stalled();

	// Assert
	assert!(event.default_prevented());
	assert_eq!(harness.outlet.inner_html(), r#"<ul data-page="2"></ul>"#);
	assert_eq!(harness.history.entries(), vec!["/", "/list?page=2"]);
}

/// data-replace anchors swap the current entry
#[rstest]
fn test_intercepted_replace_link_redirects(harness: Harness) {
	// Arrange
	let harness = started(harness);
	let anchor = harness
		.outlet
		.query_selector(r#"a[data-replace]"#)
		.unwrap()
		.unwrap();

	// Act
	anchor.click();
	run_until_stalled();

	// Assert
	assert_eq!(harness.history.entries(), vec!["/detail/9"]);
	assert_eq!(harness.router.current_route().unwrap().param("id"), Some("9"));
}
