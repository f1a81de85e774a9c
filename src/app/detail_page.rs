//! Single paste view.

use async_trait::async_trait;
use dropnote_pages::markup::escape_html;
use dropnote_pages::{Component, ComponentError, Context, RouterContextExt, info_log};

pub struct DetailCodePage;

impl DetailCodePage {
	/// The `id` query value of the route this page was opened for.
	fn paste_id(ctx: &Context<Self>) -> Option<String> {
		ctx.route()
			.and_then(|route| route.query_value("id").map(str::to_string))
	}
}

#[async_trait(?Send)]
impl Component for DetailCodePage {
	type Props = ();
	type State = ();

	fn create(_props: &()) -> Self {
		DetailCodePage
	}

	fn template(&self, ctx: &Context<Self>) -> String {
		let subtitle = match Self::paste_id(ctx) {
			Some(id) => format!(r#"Paste <code id="paste-id">{}</code>"#, escape_html(&id)),
			None => "No paste selected.".to_string(),
		};
		format!(
			r#"<div class="w-full h-full flex flex-col items-center justify-center"><div class="w-full max-w-5xl p-4"><h1 class="text-2xl font-bold mb-4">Detail Code Page</h1><p class="text-gray-600">{subtitle}</p></div></div>"#
		)
	}

	async fn mounted(&self, ctx: &Context<Self>) -> Result<(), ComponentError> {
		if let Some(router) = ctx.router() {
			info_log!("detail page at {}", router.current_path());
		}
		Ok(())
	}
}
