//! Component errors.

use thiserror::Error;

use crate::dom::DomError;

/// Errors raised while mounting or updating components.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComponentError {
	/// A container or child anchor selector matched nothing.
	#[error("container not found: {selector}")]
	ContainerMissing { selector: String },

	/// The operation needs a container and the component has none.
	#[error("{component} is not mounted")]
	NotMounted { component: &'static str },

	/// A keyed child was re-declared with a different component type.
	#[error("child `{key}` is not a {expected}")]
	PropsMismatch { key: String, expected: &'static str },

	/// An overridable hook reported failure.
	#[error("{component}: {message}")]
	Hook {
		component: &'static str,
		message: String,
	},

	#[error(transparent)]
	Dom(#[from] DomError),
}

impl ComponentError {
	/// Builds a [`ComponentError::Hook`] from any displayable error.
	pub fn hook(component: &'static str, message: impl std::fmt::Display) -> Self {
		ComponentError::Hook {
			component,
			message: message.to_string(),
		}
	}
}
