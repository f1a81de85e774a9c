//! Site header with the main navigation.

use std::cell::Cell;

use async_trait::async_trait;
use dropnote_pages::markup::escape_html;
use dropnote_pages::router::{ListenerId, split_location};
use dropnote_pages::{Component, ComponentError, Context, RouterContextExt, warn_log};
use serde::Serialize;

/// Navigation buttons and the paths they lead to.
pub const NAVIGATION: [(&str, &str, &str); 3] = [
	("home-navigation", "Home", "/"),
	("list-navigation", "List", "/list"),
	("contact-navigation", "About", "/about"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderProps {
	pub title: String,
}

impl Default for HeaderProps {
	fn default() -> Self {
		Self {
			title: "Drop Note".to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderState {
	pub current_path: String,
}

pub struct Header {
	route_listener: Cell<Option<ListenerId>>,
}

fn target_for(id: &str) -> Option<&'static str> {
	NAVIGATION
		.iter()
		.find(|(button, _, _)| *button == id)
		.map(|(_, _, path)| *path)
}

#[async_trait(?Send)]
impl Component for Header {
	type Props = HeaderProps;
	type State = HeaderState;

	fn create(_props: &HeaderProps) -> Self {
		Header {
			route_listener: Cell::new(None),
		}
	}

	fn initial_state(_props: &HeaderProps) -> HeaderState {
		HeaderState {
			current_path: "/".to_string(),
		}
	}

	fn template(&self, ctx: &Context<Self>) -> String {
		let current = ctx.state().current_path.clone();
		let items: String = NAVIGATION
			.iter()
			.map(|(id, label, path)| {
				let class = if *path == current {
					"text-white"
				} else {
					"text-gray-300 hover:text-white"
				};
				format!(r#"<li><button id="{id}" class="{class}">{label}</button></li>"#)
			})
			.collect();
		format!(
			r#"<header class="text-white p-4 max-h-16"><div class="flex items-center justify-between w-full h-full"><h1 class="text-2xl font-bold">{}</h1><nav><ul class="flex gap-4 items-center font-bold">{}</ul></nav></div></header>"#,
			escape_html(&ctx.props().title),
			items
		)
	}

	fn bind_events(&self, ctx: &Context<Self>) {
		let scope = ctx.scope();
		let bound = ctx.listen_container("click", move |event| {
			let Some(id) = event.target().and_then(|target| target.get_attribute("id")) else {
				return;
			};
			let Some(path) = target_for(&id) else {
				return;
			};
			if let Some(ctx) = scope.context() {
				ctx.set_state(|state| state.current_path = path.to_string());
				ctx.navigate_to(path);
			}
		});
		if let Err(err) = bound {
			warn_log!("header navigation not bound: {}", err);
		}
	}

	async fn mounted(&self, ctx: &Context<Self>) -> Result<(), ComponentError> {
		let Some(router) = ctx.router() else {
			return Ok(());
		};
		let scope = ctx.scope();
		let id = router.on_after_change(move |change| {
			let path = change.to.path.clone();
			scope.set_state(|state| state.current_path = path);
		});
		self.route_listener.set(Some(id));
		let current = router.current_path();
		let (pathname, _) = split_location(&current);
		let pathname = pathname.to_string();
		ctx.set_state(|state| state.current_path = pathname);
		Ok(())
	}

	fn update_dynamic_content(&self, ctx: &Context<Self>) {
		let current = ctx.state().current_path.clone();
		for (id, _, path) in NAVIGATION {
			let selector = format!("#{id}");
			let active = path == current;
			ctx.update_class(&selector, "text-white", active);
			ctx.update_class(&selector, "text-gray-300", !active);
		}
	}

	fn cleanup(&self, ctx: &Context<Self>) {
		if let (Some(id), Some(router)) = (self.route_listener.take(), ctx.router()) {
			router.off(id);
		}
	}
}
