//! Location splitting and query-string parsing.

use std::collections::HashMap;

use crate::warn_log;

/// Splits a location into its pathname and query string.
///
/// The leading `?` is dropped and any `#fragment` is ignored.
///
/// ```
/// use dropnote_pages::router::split_location;
///
/// assert_eq!(split_location("/detail?id=3#top"), ("/detail", "id=3"));
/// assert_eq!(split_location("/list"), ("/list", ""));
/// ```
pub fn split_location(location: &str) -> (&str, &str) {
	let without_fragment = location
		.split_once('#')
		.map_or(location, |(before, _)| before);
	match without_fragment.split_once('?') {
		Some((pathname, search)) => (pathname, search),
		None => (without_fragment, ""),
	}
}

/// Parses `search` (with or without a leading `?`) into decoded pairs.
///
/// When a key repeats, the last value wins. Malformed input yields an
/// empty map.
pub fn parse_query(search: &str) -> HashMap<String, String> {
	let search = search.strip_prefix('?').unwrap_or(search);
	if search.is_empty() {
		return HashMap::new();
	}
	match serde_urlencoded::from_str::<Vec<(String, String)>>(search) {
		Ok(pairs) => pairs.into_iter().collect(),
		Err(err) => {
			warn_log!("ignoring malformed query string {:?}: {}", search, err);
			HashMap::new()
		}
	}
}
