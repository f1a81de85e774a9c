//! HTML escaping for string templates
//!
//! Templates are plain strings, so every value interpolated into markup
//! goes through one of these helpers.

/// Escape HTML special characters
///
/// # Examples
///
/// ```
/// use dropnote_pages::markup::escape_html;
///
/// let escaped = escape_html("<b>Tom & 'Jerry'</b>");
/// assert_eq!(escaped, "&lt;b&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/b&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
	input
		.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

/// Escape a value placed inside a double-quoted attribute
///
/// # Examples
///
/// ```
/// use dropnote_pages::markup::escape_attr;
///
/// assert_eq!(escape_attr("a\"b\nc"), "a&quot;b&#10;c");
/// ```
pub fn escape_attr(input: &str) -> String {
	escape_html(input)
		.replace('\n', "&#10;")
		.replace('\r', "&#13;")
}
