//! Landing page: counter demo and the paste editor.

use std::cell::RefCell;

use async_trait::async_trait;
use dropnote_pages::markup::escape_html;
use dropnote_pages::{Callback, Component, ComponentError, Context, warn_log};
use serde::Serialize;

use super::button::{Button, ButtonProps};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainPageState {
	pub desc: String,
	pub count: u32,
	pub code: String,
}

impl Default for MainPageState {
	fn default() -> Self {
		Self {
			desc: "Share code snippets that expire on their own.".to_string(),
			count: 0,
			code: "// Type your code here".to_string(),
		}
	}
}

pub struct MainPage {
	increment: RefCell<Option<Callback<()>>>,
}

#[async_trait(?Send)]
impl Component for MainPage {
	type Props = ();
	type State = MainPageState;

	fn create(_props: &()) -> Self {
		MainPage {
			increment: RefCell::new(None),
		}
	}

	fn created(&self, ctx: &Context<Self>) {
		let scope = ctx.scope();
		let increment = Callback::new(move |()| {
			scope.set_state(|state| state.count += 1);
		});
		self.increment.replace(Some(increment));
	}

	fn template(&self, ctx: &Context<Self>) -> String {
		let state = ctx.state();
		format!(
			r#"<div class="container mx-auto p-4"><h1 class="text-2xl font-bold mb-4">Drop Note</h1><p class="mb-4">{desc}</p><p>Count: <span id="count-display">{count}</span></p><div id="button-container" class="mb-4"></div><div class="mb-4"><h3 class="text-lg font-semibold mb-2">Code Editor</h3><div id="editor-container"><textarea id="code-editor" spellcheck="false">{code}</textarea></div><pre id="code-preview">{code}</pre></div></div>"#,
			desc = escape_html(&state.desc),
			count = state.count,
			code = escape_html(&state.code),
		)
	}

	fn mount_children(&self, ctx: &Context<Self>) -> Result<(), ComponentError> {
		let mut props = ButtonProps::new("test-button").text("Click Me");
		if let Some(increment) = self.increment.borrow().clone() {
			props = props.on_click(increment);
		}
		ctx.add_child_keyed::<Button>(props, "#button-container", "test-button")?;
		Ok(())
	}

	fn bind_events(&self, ctx: &Context<Self>) {
		let scope = ctx.scope();
		let bound = ctx.listen_selector("#code-editor", "input", move |event| {
			let Some(code) = event.target().and_then(|editor| editor.value()) else {
				return;
			};
			scope.set_state(|state| state.code = code);
		});
		if let Err(err) = bound {
			warn_log!("editor input not bound: {}", err);
		}
	}

	fn update_dynamic_content(&self, ctx: &Context<Self>) {
		if ctx.changed("count") {
			ctx.update_text_content("#count-display", &ctx.state().count.to_string());
		}
		if ctx.changed("code") {
			let code = ctx.state().code.clone();
			ctx.update_text_content("#code-preview", &code);
		}
	}
}
