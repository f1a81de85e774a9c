//! Route path patterns.
//!
//! Patterns and paths are compared segment by segment after splitting on
//! `/`. A segment starting with `:` captures whatever the path holds at
//! that position, including an empty string.

use std::collections::HashMap;

use super::core::RouterError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Param(String),
}

impl Segment {
	fn parse(raw: &str) -> Self {
		match raw.strip_prefix(':') {
			Some(name) => Segment::Param(name.to_string()),
			None => Segment::Literal(raw.to_string()),
		}
	}

	fn accepts(&self, part: &str) -> bool {
		match self {
			Segment::Literal(literal) => literal == part,
			Segment::Param(_) => true,
		}
	}
}

/// How many path segments a pattern must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
	/// Segment counts must be equal.
	Exact,
	/// The path may have extra trailing segments.
	Prefix,
}

/// A parsed route pattern such as `/users/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
	pattern: String,
	segments: Vec<Segment>,
}

impl PathPattern {
	pub fn new(pattern: impl Into<String>) -> Self {
		let pattern = pattern.into();
		let segments = pattern.split('/').map(Segment::parse).collect();
		Self { pattern, segments }
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	pub fn param_names(&self) -> Vec<&str> {
		self.segments
			.iter()
			.filter_map(|segment| match segment {
				Segment::Param(name) => Some(name.as_str()),
				Segment::Literal(_) => None,
			})
			.collect()
	}

	/// Tests `pathname` (no query string) against this pattern.
	pub fn matches(&self, pathname: &str, mode: MatchMode) -> bool {
		let parts: Vec<&str> = pathname.split('/').collect();
		let length_ok = match mode {
			MatchMode::Exact => parts.len() == self.segments.len(),
			MatchMode::Prefix => self.segments.len() <= parts.len(),
		};
		length_ok
			&& self
				.segments
				.iter()
				.zip(&parts)
				.all(|(segment, part)| segment.accepts(part))
	}

	/// Values captured by each `:param`. Params past the end of the path
	/// capture an empty string.
	pub fn extract_params(&self, pathname: &str) -> HashMap<String, String> {
		let parts: Vec<&str> = pathname.split('/').collect();
		self.segments
			.iter()
			.enumerate()
			.filter_map(|(index, segment)| match segment {
				Segment::Param(name) => Some((
					name.clone(),
					parts.get(index).copied().unwrap_or_default().to_string(),
				)),
				Segment::Literal(_) => None,
			})
			.collect()
	}

	/// Builds a concrete path by substituting `params`.
	pub fn reverse(&self, params: &HashMap<String, String>) -> Result<String, RouterError> {
		let parts = self
			.segments
			.iter()
			.map(|segment| match segment {
				Segment::Literal(literal) => Ok(literal.clone()),
				Segment::Param(name) => params
					.get(name)
					.cloned()
					.ok_or_else(|| RouterError::MissingParameter(name.clone())),
			})
			.collect::<Result<Vec<_>, _>>()?;
		Ok(parts.join("/"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case("/", "/", MatchMode::Exact, true)]
	#[case("/", "/list", MatchMode::Exact, false)]
	#[case("/", "/list", MatchMode::Prefix, false)]
	#[case("/list", "/list", MatchMode::Exact, true)]
	#[case("/list", "/list/2", MatchMode::Exact, false)]
	#[case("/list", "/list/2", MatchMode::Prefix, true)]
	#[case("/users/:id", "/users/42", MatchMode::Exact, true)]
	#[case("/users/:id", "/users/", MatchMode::Exact, true)]
	#[case("/users/:id", "/users", MatchMode::Exact, false)]
	#[case("/users/:id", "/posts/42", MatchMode::Exact, false)]
	#[case("/list/", "/list", MatchMode::Exact, false)]
	fn test_matches(
		#[case] pattern: &str,
		#[case] path: &str,
		#[case] mode: MatchMode,
		#[case] expected: bool,
	) {
		// Arrange
		let pattern = PathPattern::new(pattern);

		// Act
		let matched = pattern.matches(path, mode);

		// Assert
		assert_eq!(matched, expected);
	}

	#[rstest]
	fn test_extract_params_fills_missing_with_empty() {
		// Arrange
		let pattern = PathPattern::new("/users/:id/:tab");

		// Act
		let full = pattern.extract_params("/users/7/posts");
		let short = pattern.extract_params("/users/7");

		// Assert
		assert_eq!(full.get("id").map(String::as_str), Some("7"));
		assert_eq!(full.get("tab").map(String::as_str), Some("posts"));
		assert_eq!(short.get("tab").map(String::as_str), Some(""));
	}

	#[rstest]
	fn test_reverse_substitutes_params() {
		// Arrange
		let pattern = PathPattern::new("/users/:id/posts/:post");
		let params = HashMap::from([
			("id".to_string(), "3".to_string()),
			("post".to_string(), "9".to_string()),
		]);

		// Act
		let path = pattern.reverse(&params).unwrap();

		// Assert
		assert_eq!(path, "/users/3/posts/9");
	}

	#[rstest]
	fn test_reverse_reports_missing_param() {
		// Arrange
		let pattern = PathPattern::new("/users/:id");

		// Act
		let result = pattern.reverse(&HashMap::new());

		// Assert
		assert_eq!(result, Err(RouterError::MissingParameter("id".to_string())));
	}

	proptest! {
		#[test]
		fn prop_literal_patterns_match_themselves(segments in prop::collection::vec("[a-z0-9-]{1,8}", 0..5)) {
			let path = format!("/{}", segments.join("/"));
			let pattern = PathPattern::new(path.clone());
			prop_assert!(pattern.matches(&path, MatchMode::Exact));
			prop_assert!(pattern.matches(&path, MatchMode::Prefix));
		}

		#[test]
		fn prop_params_capture_their_segment(
			values in prop::collection::vec("[A-Za-z0-9_.~-]{0,8}", 1..5)
		) {
			let names: Vec<String> = (0..values.len()).map(|i| format!("p{i}")).collect();
			let pattern = PathPattern::new(format!("/items/:{}", names.join("/:")));
			let path = format!("/items/{}", values.join("/"));

			prop_assert!(pattern.matches(&path, MatchMode::Exact));
			let params = pattern.extract_params(&path);
			for (name, value) in names.iter().zip(&values) {
				prop_assert_eq!(params.get(name), Some(value));
			}
		}

		#[test]
		fn prop_exact_match_implies_prefix_match(
			pattern in "(/[a-z:]{0,4}){1,4}",
			path in "(/[a-z]{0,4}){1,5}"
		) {
			let pattern = PathPattern::new(pattern);
			if pattern.matches(&path, MatchMode::Exact) {
				prop_assert!(pattern.matches(&path, MatchMode::Prefix));
			}
		}
	}
}
