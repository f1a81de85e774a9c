//! Typed access to route parameters.
//!
//! # Example
//!
//! ```ignore
//! let id: u64 = route.param_as("id")?;
//! let page: u32 = route.query_as("page").unwrap_or(1);
//! ```

use thiserror::Error;

/// Errors raised while converting a route parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
	#[error("missing parameter `{0}`")]
	Missing(String),

	#[error("parameter `{name}` = {raw_value:?} is not a valid {param_type}: {reason}")]
	ParseError {
		name: String,
		param_type: &'static str,
		raw_value: String,
		reason: String,
	},
}

/// Conversion from a raw path or query value.
pub trait FromPath: Sized {
	fn from_path(name: &str, raw: &str) -> Result<Self, PathError>;
}

// Macro for implementing FromPath for primitive types
macro_rules! impl_from_path_for_primitive {
	($($ty:ty => $type_name:expr),* $(,)?) => {
		$(
			impl FromPath for $ty {
				fn from_path(name: &str, raw: &str) -> Result<Self, PathError> {
					raw.parse::<$ty>().map_err(|e| PathError::ParseError {
						name: name.to_string(),
						param_type: $type_name,
						raw_value: raw.to_string(),
						reason: e.to_string(),
					})
				}
			}
		)*
	};
}

impl_from_path_for_primitive! {
	i32 => "i32",
	i64 => "i64",
	u32 => "u32",
	u64 => "u64",
	usize => "usize",
	f64 => "f64",
	bool => "bool",
}

impl FromPath for String {
	fn from_path(_name: &str, raw: &str) -> Result<Self, PathError> {
		Ok(raw.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("42", Ok(42))]
	#[case("-1", Err("u64"))]
	#[case("", Err("u64"))]
	fn test_u64_from_path(#[case] raw: &str, #[case] expected: Result<u64, &str>) {
		// Act
		let result = u64::from_path("id", raw);

		// Assert
		match (result, expected) {
			(Ok(value), Ok(want)) => assert_eq!(value, want),
			(Err(PathError::ParseError { param_type, name, .. }), Err(want)) => {
				assert_eq!(param_type, want);
				assert_eq!(name, "id");
			}
			(other, want) => panic!("unexpected {other:?} for {want:?}"),
		}
	}

	#[rstest]
	fn test_string_accepts_anything() {
		assert_eq!(String::from_path("q", "a b").unwrap(), "a b");
	}
}
