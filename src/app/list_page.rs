//! Paginated paste list.

use async_trait::async_trait;
use dropnote_pages::dom::{Element, Event};
use dropnote_pages::markup::{escape_attr, escape_html};
use dropnote_pages::{Component, ComponentError, Context, RouterContextExt, Scope, spawn, warn_log};
use serde::Serialize;

use super::paste::{Paste, PasteError, PasteService};

/// Page numbers shown in the pagination bar.
///
/// The window is centered on `current` where possible and clamped to
/// `1..=total`.
///
/// ```
/// use dropnote::app::pagination_window;
///
/// assert_eq!(pagination_window(7, 20, 5), vec![5, 6, 7, 8, 9]);
/// assert_eq!(pagination_window(19, 20, 5), vec![16, 17, 18, 19, 20]);
/// assert_eq!(pagination_window(1, 3, 10), vec![1, 2, 3]);
/// ```
pub fn pagination_window(current: u32, total: u32, window: u32) -> Vec<u32> {
	let half = window / 2;
	let mut start = current.saturating_sub(half).max(1);
	let end = start + window.saturating_sub(1);
	if end > total {
		start = (total + 1).saturating_sub(window).max(1);
	}
	let count = window.min(total);
	(start..start + count).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPageProps {
	pub page_scale: u32,
	pub pagination_window: u32,
}

impl Default for ListPageProps {
	fn default() -> Self {
		Self {
			page_scale: 10,
			pagination_window: 10,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListPageState {
	pub pastes: Vec<Paste>,
	pub total_pages: u32,
	pub current_page: u32,
	pub is_loading: bool,
	pub is_error: bool,
}

impl Default for ListPageState {
	fn default() -> Self {
		Self {
			pastes: Vec::new(),
			total_pages: 0,
			current_page: 1,
			is_loading: true,
			is_error: false,
		}
	}
}

pub struct ListPage;

impl ListPage {
	/// Fetches the current page in the background.
	fn reload(scope: Scope<Self>) {
		spawn::spawn_local(async move {
			let Some(ctx) = scope.context() else {
				return;
			};
			Self::load(&ctx).await;
		});
	}

	async fn load(ctx: &Context<Self>) {
		ctx.set_state(|state| {
			state.is_loading = true;
			state.is_error = false;
		});
		let Some(service) = ctx.consume::<PasteService>() else {
			warn_log!("no paste service available");
			ctx.set_state(|state| {
				state.is_loading = false;
				state.is_error = true;
			});
			return;
		};
		let page = ctx.state().current_page;
		let scale = ctx.props().page_scale;
		match service.list(page, scale).await {
			Ok(result) => ctx.set_state(|state| {
				state.pastes = result.pastes;
				state.total_pages = result.total_pages;
				state.is_loading = false;
			}),
			Err(err) => {
				if err == PasteError::TooManyRequests {
					warn_log!("paste list throttled: {}", err);
				} else {
					warn_log!("failed to load pastes: {}", err);
				}
				ctx.set_state(|state| {
					state.is_loading = false;
					state.is_error = true;
				});
			}
		}
	}

	fn render_list(state: &ListPageState) -> String {
		if state.is_loading {
			return r#"<div class="flex flex-col items-center justify-center text-gray-500 min-h-64"><div class="animate-spin rounded-full h-8 w-8 border-b-2 border-gray-900 mb-4"></div><span>Loading...</span></div>"#.to_string();
		}
		if state.is_error {
			return r#"<div><span class="text-red-500">An error occurred while fetching data.</span><button id="retry-button" class="mt-2 px-4 py-2 bg-blue-500 text-white rounded">Retry</button></div>"#.to_string();
		}
		if state.pastes.is_empty() {
			return r#"<div class="flex flex-col items-center justify-center text-gray-500 min-h-64">No data available</div>"#.to_string();
		}
		state
			.pastes
			.iter()
			.map(|paste| {
				format!(
					r#"<button class="w-full flex items-center justify-between" data-paste-id="{}"><div><span>{}</span></div><div><span>{}</span></div><div><span>{}</span></div><div><span>{}</span></div></button>"#,
					escape_attr(&paste.id),
					escape_html(paste.title.as_deref().unwrap_or("untitled")),
					escape_html(&paste.language),
					escape_html(&paste.created_at),
					escape_html(&paste.expires_at),
				)
			})
			.collect()
	}

	fn render_pagination(state: &ListPageState, window: u32) -> String {
		pagination_window(state.current_page, state.total_pages, window)
			.into_iter()
			.map(|page| {
				let tone = if page == state.current_page {
					"bg-amber-200"
				} else {
					"bg-secondary"
				};
				format!(
					r#"<button class="px-4 py-2 rounded-md text-sm font-semibold {tone}" data-pagination-id="{page}">{page}</button>"#
				)
			})
			.collect()
	}

	fn on_click(scope: &Scope<Self>, event: &Event) {
		let Some(target) = event.target() else {
			return;
		};
		let Some(ctx) = scope.context() else {
			return;
		};
		if target.get_attribute("id").as_deref() == Some("retry-button") {
			Self::reload(scope.clone());
			return;
		}
		if let Some(id) = attribute_of(&target, "button[data-paste-id]", "data-paste-id") {
			ctx.navigate_to(&format!("/detail?id={id}"));
			return;
		}
		let page = attribute_of(&target, "button[data-pagination-id]", "data-pagination-id")
			.and_then(|raw| raw.trim().parse::<u32>().ok());
		let current = ctx.state().current_page;
		if let Some(page) = page
			&& page != current
		{
			ctx.set_state(|state| state.current_page = page);
			Self::reload(scope.clone());
		}
	}
}

fn attribute_of(target: &Element, selector: &str, name: &str) -> Option<String> {
	target.closest(selector).ok().flatten()?.get_attribute(name)
}

#[async_trait(?Send)]
impl Component for ListPage {
	type Props = ListPageProps;
	type State = ListPageState;

	fn create(_props: &ListPageProps) -> Self {
		ListPage
	}

	fn template(&self, ctx: &Context<Self>) -> String {
		let state = ctx.state();
		format!(
			r#"<div class="w-full h-[80vh] flex flex-col items-center"><div class="w-full flex items-center justify-between list-header border-b pb-3"><div><span>Name</span></div><div><span>Syntax</span></div><div><span>Created</span></div><div><span>Expired</span></div></div><div id="paste-list__container" class="w-full h-full flex flex-col gap-4 py-4">{}</div><div id="paste-list__pagination">{}</div></div>"#,
			Self::render_list(&state),
			Self::render_pagination(&state, ctx.props().pagination_window),
		)
	}

	fn bind_events(&self, ctx: &Context<Self>) {
		let scope = ctx.scope();
		if let Err(err) = ctx.listen_container("click", move |event| Self::on_click(&scope, event)) {
			warn_log!("paste list clicks not bound: {}", err);
		}
	}

	async fn mounted(&self, ctx: &Context<Self>) -> Result<(), ComponentError> {
		let requested = ctx
			.route()
			.and_then(|route| route.query_as::<u32>("page").ok())
			.filter(|page| *page > 0);
		if let Some(page) = requested {
			ctx.set_state(|state| state.current_page = page);
		}
		Self::reload(ctx.scope());
		Ok(())
	}

	fn update_dynamic_content(&self, ctx: &Context<Self>) {
		let (list, pagination) = {
			let state = ctx.state();
			(
				Self::render_list(&state),
				Self::render_pagination(&state, ctx.props().pagination_window),
			)
		};
		ctx.update_inner_html("#paste-list__container", &list);
		ctx.update_inner_html("#paste-list__pagination", &pagination);
	}
}
