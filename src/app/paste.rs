//! Paste listing service seam.
//!
//! Pages fetch pastes through a [`PasteService`] found in their context. The
//! HTTP client is supplied by the embedder; [`MemoryPasteSource`] serves a
//! fixed list and backs the native build.

use std::rc::Rc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of the paste list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paste {
	pub id: String,
	#[serde(default)]
	pub title: Option<String>,
	pub language: String,
	pub created_at: String,
	pub expires_at: String,
}

/// One page of pastes as returned by `/paste/list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastePage {
	#[serde(default)]
	pub pastes: Vec<Paste>,
	#[serde(default, rename = "total_page")]
	pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasteError {
	/// API error code 4403.
	#[error("too many requests, try again later")]
	TooManyRequests,

	/// API error code 4401.
	#[error("captcha required")]
	CaptchaRequired,

	#[error("request failed ({status}): {message}")]
	Request { status: u16, message: String },
}

impl PasteError {
	/// Maps an API `error_code` to an error.
	pub fn from_code(code: u32, message: impl Into<String>) -> Self {
		match code {
			4403 => PasteError::TooManyRequests,
			4401 => PasteError::CaptchaRequired,
			_ => PasteError::Request {
				status: 500,
				message: message.into(),
			},
		}
	}
}

/// Where pastes come from.
#[async_trait(?Send)]
pub trait PasteSource {
	/// Page `page` (1-based) holding up to `scale` pastes.
	async fn list(&self, page: u32, scale: u32) -> Result<PastePage, PasteError>;
}

/// Shared handle to a [`PasteSource`], provided through component context.
#[derive(Clone)]
pub struct PasteService(Rc<dyn PasteSource>);

impl PasteService {
	pub fn new(source: impl PasteSource + 'static) -> Self {
		Self(Rc::new(source))
	}

	/// A service with no pastes.
	pub fn empty() -> Self {
		Self::new(MemoryPasteSource::default())
	}

	pub async fn list(&self, page: u32, scale: u32) -> Result<PastePage, PasteError> {
		self.0.list(page, scale).await
	}
}

impl PartialEq for PasteService {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl std::fmt::Debug for PasteService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("PasteService").finish_non_exhaustive()
	}
}

/// Serves a fixed list of pastes, `scale` at a time.
#[derive(Debug, Clone, Default)]
pub struct MemoryPasteSource {
	pastes: Vec<Paste>,
}

impl MemoryPasteSource {
	pub fn new(pastes: Vec<Paste>) -> Self {
		Self { pastes }
	}
}

#[async_trait(?Send)]
impl PasteSource for MemoryPasteSource {
	async fn list(&self, page: u32, scale: u32) -> Result<PastePage, PasteError> {
		let scale = scale.max(1) as usize;
		let total_pages = self.pastes.len().div_ceil(scale) as u32;
		let start = (page.max(1) as usize - 1) * scale;
		let pastes = self.pastes.iter().skip(start).take(scale).cloned().collect();
		Ok(PastePage {
			pastes,
			total_pages,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use dropnote_pages::spawn::block_on;
	use rstest::rstest;

	fn paste(id: usize) -> Paste {
		Paste {
			id: id.to_string(),
			title: None,
			language: "rust".to_string(),
			created_at: "2026-10-01".to_string(),
			expires_at: "2026-10-08".to_string(),
		}
	}

	#[rstest]
	#[case(1, vec!["0", "1", "2"])]
	#[case(3, vec!["6"])]
	#[case(4, vec![])]
	fn test_memory_source_pages(#[case] page: u32, #[case] expected: Vec<&str>) {
		// Arrange
		let source = MemoryPasteSource::new((0..7).map(paste).collect());

		// Act
		let result = block_on(source.list(page, 3)).unwrap();

		// Assert
		let ids: Vec<&str> = result.pastes.iter().map(|p| p.id.as_str()).collect();
		assert_eq!(ids, expected);
		assert_eq!(result.total_pages, 3);
	}

	#[rstest]
	fn test_page_deserializes_api_shape() {
		// Arrange
		let body = r#"{"pastes":[{"id":"a1","language":"go","created_at":"c","expires_at":"e"}],"total_page":4}"#;

		// Act
		let page: PastePage = serde_json::from_str(body).unwrap();

		// Assert
		assert_eq!(page.total_pages, 4);
		assert_eq!(page.pastes[0].title, None);
	}

	#[rstest]
	#[case(4403, PasteError::TooManyRequests)]
	#[case(4401, PasteError::CaptchaRequired)]
	fn test_error_codes(#[case] code: u32, #[case] expected: PasteError) {
		assert_eq!(PasteError::from_code(code, "x"), expected);
	}
}
