//! Link markup for router-aware anchors.

use crate::markup::{escape_attr, escape_html};

/// Markup builder for an `<a>` the router handles without a page load.
///
/// Pair it with [`RouterContextExt::intercept_links`](super::RouterContextExt::intercept_links)
/// on an ancestor component.
///
/// # Example
///
/// ```
/// use dropnote_pages::router::Link;
///
/// let html = Link::new("/detail?id=3", "Open").class("paste-link").render();
/// assert_eq!(
///     html,
///     r#"<a href="/detail?id=3" class="paste-link" data-link="true">Open</a>"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
	to: String,
	content: String,
	class: Option<String>,
	replace: bool,
	external: bool,
	attrs: Vec<(String, String)>,
}

impl Link {
	pub fn new(to: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			to: to.into(),
			content: content.into(),
			class: None,
			replace: false,
			external: false,
			attrs: Vec::new(),
		}
	}

	pub fn class(mut self, class: impl Into<String>) -> Self {
		self.class = Some(class.into());
		self
	}

	/// Navigate by replacing the current history entry.
	pub fn replace(mut self, replace: bool) -> Self {
		self.replace = replace;
		self
	}

	/// Open in a new tab and leave the router out of it.
	pub fn external(mut self, external: bool) -> Self {
		self.external = external;
		self
	}

	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	pub fn to(&self) -> &str {
		&self.to
	}

	pub fn is_replace(&self) -> bool {
		self.replace
	}

	pub fn is_external(&self) -> bool {
		self.external
	}

	/// The anchor markup. Content is text, not HTML.
	pub fn render(&self) -> String {
		let mut html = format!(r#"<a href="{}""#, escape_attr(&self.to));
		if let Some(class) = &self.class {
			html.push_str(&format!(r#" class="{}""#, escape_attr(class)));
		}
		if self.external {
			html.push_str(r#" target="_blank" rel="noopener noreferrer""#);
		} else {
			html.push_str(r#" data-link="true""#);
			if self.replace {
				html.push_str(r#" data-replace="true""#);
			}
		}
		for (name, value) in &self.attrs {
			html.push_str(&format!(r#" {}="{}""#, name, escape_attr(value)));
		}
		html.push('>');
		html.push_str(&escape_html(&self.content));
		html.push_str("</a>");
		html
	}
}

impl std::fmt::Display for Link {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.render())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_replace_link_carries_both_markers() {
		// Act
		let html = Link::new("/list", "List").replace(true).render();

		// Assert
		assert_eq!(
			html,
			r#"<a href="/list" data-link="true" data-replace="true">List</a>"#
		);
	}

	#[rstest]
	fn test_external_link_skips_router() {
		// Act
		let html = Link::new("https://example.com", "Out").external(true).render();

		// Assert
		assert!(html.contains(r#"target="_blank""#));
		assert!(!html.contains("data-link"));
	}

	#[rstest]
	fn test_content_and_attributes_are_escaped() {
		// Act
		let html = Link::new("/a?x=\"1\"", "<b>bold</b>")
			.attr("title", "a & b")
			.render();

		// Assert
		assert_eq!(
			html,
			r#"<a href="/a?x=&quot;1&quot;" data-link="true" title="a &amp; b">&lt;b&gt;bold&lt;/b&gt;</a>"#
		);
	}
}
