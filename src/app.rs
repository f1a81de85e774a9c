//! Drop Note application shell
//!
//! [`App`] renders the page frame, owns the [`Router`] bound to the outlet
//! inside it and mounts the [`Header`]. [`launch`] mounts one `App` into the
//! document.

mod button;
mod contact_page;
mod detail_page;
mod header;
mod list_page;
mod main_page;
mod paste;
mod routes;

use std::cell::RefCell;

use async_trait::async_trait;
use dropnote_pages::dom::{self, Element};
use dropnote_pages::{
	Component, ComponentError, ComponentHandle, Context, Router, error_log, info_log, spawn,
};

pub use button::{Button, ButtonProps};
pub use contact_page::ContactPage;
pub use detail_page::DetailCodePage;
pub use header::{Header, HeaderProps, HeaderState, NAVIGATION};
pub use list_page::{ListPage, ListPageProps, ListPageState, pagination_window};
pub use main_page::{MainPage, MainPageState};
pub use paste::{MemoryPasteSource, Paste, PasteError, PastePage, PasteService, PasteSource};
pub use routes::route_table;

use crate::settings::AppSettings;

#[derive(Debug, Clone, PartialEq)]
pub struct AppProps {
	pub settings: AppSettings,
	pub pastes: PasteService,
}

/// Root component.
pub struct App {
	router: RefCell<Option<Router>>,
}

impl App {
	/// The router currently bound to the outlet.
	pub fn router(&self) -> Option<Router> {
		self.router.borrow().clone()
	}

	/// Binds a router to `outlet` unless the current one already is.
	fn setup_router(&self, ctx: &Context<Self>, outlet: Element) {
		if let Some(existing) = self.router()
			&& existing.container() == &outlet
			&& !existing.is_destroyed()
		{
			return;
		}
		if let Some(previous) = self.router.borrow_mut().take() {
			previous.destroy();
		}
		let router = Router::new(outlet).with_context(ctx.context_map());
		router.add_routes(routes::route_table(&ctx.props().settings));
		router.on_error(|failure| error_log!("navigation to {} failed: {}", failure.path, failure.error));
		ctx.provide(router.handle());
		self.router.replace(Some(router.clone()));
		router.start();
	}
}

#[async_trait(?Send)]
impl Component for App {
	type Props = AppProps;
	type State = ();

	fn create(_props: &AppProps) -> Self {
		App {
			router: RefCell::new(None),
		}
	}

	fn created(&self, ctx: &Context<Self>) {
		ctx.provide(ctx.props().pastes.clone());
	}

	fn template(&self, ctx: &Context<Self>) -> String {
		let outlet = ctx.props().settings.router_outlet.clone();
		let outlet_id = outlet.strip_prefix('#').unwrap_or(&outlet).to_string();
		format!(
			r#"<div class="w-full h-full flex flex-col items-center relative"><main class="w-full max-w-5xl"><div class="gradient-wrapper"><div class="gradient-item first"></div><div class="gradient-item-second"></div><div class="gradient-item-third"></div></div><div id="app-header"></div><div id="{}"></div></main></div>"#,
			dropnote_pages::markup::escape_attr(&outlet_id)
		)
	}

	fn mount_children(&self, ctx: &Context<Self>) -> Result<(), ComponentError> {
		let selector = ctx.props().settings.router_outlet.clone();
		match ctx.query(&selector)? {
			Some(outlet) => self.setup_router(ctx, outlet),
			None => error_log!("Router provider element not found: {}", selector),
		}
		let title = ctx.props().settings.site_title.clone();
		ctx.add_child_keyed::<Header>(HeaderProps { title }, "#app-header", "header")?;
		Ok(())
	}

	fn cleanup(&self, _ctx: &Context<Self>) {
		if let Some(router) = self.router.borrow_mut().take() {
			router.destroy();
		}
	}
}

thread_local! {
	static APP: RefCell<Option<ComponentHandle<App>>> = const { RefCell::new(None) };
}

/// The application mounted by [`launch`], if any.
pub fn current_app() -> Option<ComponentHandle<App>> {
	APP.with(|app| app.borrow().clone())
}

/// Mounts an [`App`] into `settings.root_selector`.
///
/// A missing root element is logged and nothing is mounted. A previously
/// launched application is unmounted first.
pub fn launch(settings: AppSettings, pastes: PasteService) {
	let container = match dom::document_query(&settings.root_selector) {
		Ok(Some(container)) => container,
		Ok(None) => {
			error_log!("App container not found: {}", settings.root_selector);
			return;
		}
		Err(err) => {
			error_log!("App container lookup failed: {}", err);
			return;
		}
	};
	shutdown();
	let handle = ComponentHandle::<App>::new(AppProps { settings, pastes });
	APP.with(|app| app.replace(Some(handle.clone())));
	spawn::spawn_local(async move {
		match handle.mount(&container).await {
			Ok(()) => info_log!("Drop Note mounted"),
			Err(err) => error_log!("Drop Note failed to mount: {}", err),
		}
	});
}

/// Unmounts the application started by [`launch`].
pub fn shutdown() {
	if let Some(previous) = APP.with(|app| app.borrow_mut().take())
		&& previous.phase() != dropnote_pages::Phase::Unmounted
	{
		previous.unmount();
	}
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
	#[cfg(feature = "console_error_panic_hook")]
	console_error_panic_hook::set_once();
	launch(AppSettings::embedded(), PasteService::empty());
}
