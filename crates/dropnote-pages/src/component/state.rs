//! State change detection.
//!
//! States are compared through their `serde_json` form so components get
//! per-key change flags without writing any diffing code.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

/// Key reported for states that do not serialize to a JSON object.
pub const WHOLE_STATE_KEY: &str = "";

/// Top-level keys whose values differ between `before` and `after`.
///
/// Keys present on only one side count as changed. Non-object states
/// report [`WHOLE_STATE_KEY`] when they differ.
pub fn changed_keys<S: Serialize>(before: &S, after: &S) -> BTreeSet<String> {
	let before = to_value(before);
	let after = to_value(after);
	let mut changed = BTreeSet::new();
	match (&before, &after) {
		(Value::Object(old), Value::Object(new)) => {
			for (key, value) in new {
				if old.get(key) != Some(value) {
					changed.insert(key.clone());
				}
			}
			for key in old.keys() {
				if !new.contains_key(key) {
					changed.insert(key.clone());
				}
			}
		}
		_ => {
			if before != after {
				changed.insert(WHOLE_STATE_KEY.to_string());
			}
		}
	}
	changed
}

/// Like [`changed_keys`] for values already known to differ.
///
/// Differences the serialized form cannot see, such as `#[serde(skip)]`
/// fields, are reported as [`WHOLE_STATE_KEY`].
pub(super) fn differing_keys<S: Serialize>(before: &S, after: &S) -> BTreeSet<String> {
	let mut changed = changed_keys(before, after);
	if changed.is_empty() {
		changed.insert(WHOLE_STATE_KEY.to_string());
	}
	changed
}

fn to_value<S: Serialize>(state: &S) -> Value {
	match serde_json::to_value(state) {
		Ok(value) => value,
		Err(err) => {
			crate::warn_log!("state failed to serialize: {}", err);
			Value::Null
		}
	}
}
