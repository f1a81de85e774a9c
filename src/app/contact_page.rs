//! Static about page.

use async_trait::async_trait;
use dropnote_pages::{Component, Context};

pub struct ContactPage;

#[async_trait(?Send)]
impl Component for ContactPage {
	type Props = ();
	type State = ();

	fn create(_props: &()) -> Self {
		ContactPage
	}

	fn template(&self, _ctx: &Context<Self>) -> String {
		concat!(
			r#"<section><article class="flex flex-col gap-2">"#,
			r#"<div class="flex py-16 relative"><div class="gradient-title__sub"></div><h2 class="font-medium text-8xl">About</h2></div>"#,
			r#"<div class="flex flex-col items-end gap-16"><div class="w-1/2 text-left border-b border-gray-600 pb-6">"#,
			r#"<p class="leading-8">Drop Note is a small paste sharing tool: write a snippet, pick how long it lives, and share the link.</p>"#,
			r#"</div></div>"#,
			r#"<div class="flex flex-col items-start gap-16 mt-48"><div class="w-1/2 text-left flex flex-col gap-4">"#,
			r#"<p class="font-medium text-2xl">About This Project</p>"#,
			r#"<p class="leading-8">The client renders string templates into plain DOM nodes and patches them in place, with a small history router switching pages.</p>"#,
			r#"</div></div>"#,
			r#"</article></section>"#,
		)
		.to_string()
	}
}
