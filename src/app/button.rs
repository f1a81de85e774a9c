//! Push button with an optional click callback.

use async_trait::async_trait;
use dropnote_pages::markup::{escape_attr, escape_html};
use dropnote_pages::{Callback, Component, Context};

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonProps {
	pub id: String,
	pub text: Option<String>,
	pub on_click: Option<Callback<()>>,
}

impl ButtonProps {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			text: None,
			on_click: None,
		}
	}

	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.text = Some(text.into());
		self
	}

	pub fn on_click(mut self, callback: Callback<()>) -> Self {
		self.on_click = Some(callback);
		self
	}
}

pub struct Button;

#[async_trait(?Send)]
impl Component for Button {
	type Props = ButtonProps;
	type State = ();

	fn create(_props: &ButtonProps) -> Self {
		Button
	}

	fn template(&self, ctx: &Context<Self>) -> String {
		let props = ctx.props();
		format!(
			r#"<button id="{}" class="px-6 py-2 bg-blue-500 hover:bg-blue-600 rounded-md text-sm font-semibold"><span class="text-white">{}</span></button>"#,
			escape_attr(&props.id),
			escape_html(props.text.as_deref().unwrap_or("Click Me"))
		)
	}

	fn bind_events(&self, ctx: &Context<Self>) {
		let Some(on_click) = ctx.props().on_click.clone() else {
			return;
		};
		if let Err(err) = ctx.listen_selector("button", "click", move |_| on_click.call(())) {
			dropnote_pages::error_log!("button {} not bound: {}", ctx.props().id, err);
		}
	}

	/// The rendered element is found by tag, so an `id` change is patched
	/// like any other prop.
	fn update_dynamic_content(&self, ctx: &Context<Self>) {
		let props = ctx.props();
		ctx.update_attribute("button", "id", &props.id);
		ctx.update_text_content("button span", props.text.as_deref().unwrap_or("Click Me"));
	}

	/// A new `on_click` only takes effect once listeners are rebound.
	fn should_rebind_events(&self, _ctx: &Context<Self>) -> bool {
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use dropnote_pages::ComponentHandle;
	use dropnote_pages::dom::Element;
	use dropnote_pages::spawn::{block_on, run_until_stalled};
	use rstest::rstest;
	use std::cell::Cell;
	use std::rc::Rc;

	#[rstest]
	fn test_changed_id_and_text_are_patched_and_still_clickable() {
		// Arrange
		let clicks = Rc::new(Cell::new(0));
		let counter = Rc::clone(&clicks);
		let on_click = Callback::new(move |()| counter.set(counter.get() + 1));
		let container = Element::new("div");
		let handle = ComponentHandle::<Button>::new(
			ButtonProps::new("first").text("One").on_click(on_click.clone()),
		);
		block_on(handle.mount(&container)).unwrap();
		run_until_stalled();

		// Act
		handle.set_props(ButtonProps::new("second").text("Two").on_click(on_click));
		run_until_stalled();

		// Assert
		assert!(container.query_selector("#first").unwrap().is_none());
		let button = container.query_selector("#second").unwrap().unwrap();
		assert_eq!(button.query_selector("span").unwrap().unwrap().text_content(), "Two");
		button.click();
		assert_eq!(clicks.get(), 1);
	}
}
