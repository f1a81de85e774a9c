//! The `Component` trait.

use async_trait::async_trait;
use serde::Serialize;

use super::{ComponentError, Context};

/// A stateful UI unit rendered from a string template.
///
/// The runtime owns the lifecycle: it renders [`template`](Component::template)
/// into the container on mount, lets the component attach children and
/// listeners, and afterwards calls the update hooks whenever props or state
/// change. Only `template` is required.
///
/// ## Example
///
/// ```ignore
/// use dropnote_pages::{Component, Context};
///
/// struct Counter;
///
/// #[derive(Clone, PartialEq, Default, serde::Serialize)]
/// struct CounterState {
///     count: u32,
/// }
///
/// impl Component for Counter {
///     type Props = ();
///     type State = CounterState;
///
///     fn create(_props: &()) -> Self {
///         Counter
///     }
///
///     fn template(&self, ctx: &Context<Self>) -> String {
///         format!(r#"<span id="count">{}</span>"#, ctx.state().count)
///     }
///
///     fn update_dynamic_content(&self, ctx: &Context<Self>) {
///         if ctx.changed("count") {
///             ctx.update_text_content("#count", &ctx.state().count.to_string());
///         }
///     }
/// }
/// ```
#[async_trait(?Send)]
pub trait Component: Sized + 'static {
	/// Values handed down by the parent. Compared by value to detect changes.
	type Props: Clone + PartialEq + 'static;

	/// Internal state. Serialized with `serde_json` to find changed keys.
	type State: Clone + PartialEq + Serialize + Default + 'static;

	/// Builds the component instance. Runs once per handle.
	fn create(props: &Self::Props) -> Self;

	/// Name used in logs and error messages.
	fn name() -> &'static str {
		std::any::type_name::<Self>()
			.rsplit("::")
			.next()
			.unwrap_or("Component")
	}

	fn initial_state(_props: &Self::Props) -> Self::State {
		Self::State::default()
	}

	/// Markup for the first render. Values must be escaped by the caller.
	fn template(&self, ctx: &Context<Self>) -> String;

	/// Runs once right after construction, before any rendering.
	fn created(&self, _ctx: &Context<Self>) {}

	/// Declares children with [`Context::add_child`].
	///
	/// Called after the first render and again on every update, where
	/// re-declared keys are reconciled instead of remounted.
	fn mount_children(&self, _ctx: &Context<Self>) -> Result<(), ComponentError> {
		Ok(())
	}

	/// Attaches DOM listeners. Listeners registered here are dropped and
	/// re-attached when [`should_rebind_events`](Component::should_rebind_events)
	/// asks for it.
	fn bind_events(&self, _ctx: &Context<Self>) {}

	/// Runs after the first render. An error aborts the mount.
	async fn mounted(&self, _ctx: &Context<Self>) -> Result<(), ComponentError> {
		Ok(())
	}

	/// Patches the rendered markup after a props or state change.
	fn update_dynamic_content(&self, _ctx: &Context<Self>) {}

	fn should_rebind_events(&self, _ctx: &Context<Self>) -> bool {
		false
	}

	/// Whether a reconciled child should re-run its update pass.
	fn should_update_child(&self, _key: &str, _ctx: &Context<Self>) -> bool {
		true
	}

	/// Runs during unmount, after resources are released and before the
	/// children are torn down.
	fn cleanup(&self, _ctx: &Context<Self>) {}
}
