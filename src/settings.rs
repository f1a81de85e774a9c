//! Application settings
//!
//! Settings are read from TOML. The copy compiled into the binary comes
//! from `config/app.toml`; every key may be omitted.
//!
//! ```
//! use dropnote::settings::AppSettings;
//!
//! let settings = AppSettings::from_toml_str("[list]\npage_scale = 25\n").unwrap();
//! assert_eq!(settings.list.page_scale, 25);
//! assert_eq!(settings.root_selector, "#app");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

const EMBEDDED: &str = include_str!("../config/app.toml");

/// Settings error
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("Invalid value for '{key}': {message}")]
	InvalidValue { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
	pub site_title: String,
	/// Element the `App` component mounts into.
	pub root_selector: String,
	/// Element inside the `App` template the router renders into.
	pub router_outlet: String,
	pub list: ListSettings,
}

/// Paste list paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSettings {
	/// Pastes requested per page.
	pub page_scale: u32,
	/// Page buttons shown at once.
	pub pagination_window: u32,
}

impl Default for AppSettings {
	fn default() -> Self {
		Self {
			site_title: "Drop Note".to_string(),
			root_selector: "#app".to_string(),
			router_outlet: "#router-provider".to_string(),
			list: ListSettings::default(),
		}
	}
}

impl Default for ListSettings {
	fn default() -> Self {
		Self {
			page_scale: 10,
			pagination_window: 10,
		}
	}
}

impl AppSettings {
	/// Parses and validates settings.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// The settings compiled in from `config/app.toml`, or the defaults
	/// when that file is invalid.
	pub fn embedded() -> Self {
		Self::from_toml_str(EMBEDDED).unwrap_or_else(|err| {
			dropnote_pages::error_log!("embedded settings rejected, using defaults: {}", err);
			Self::default()
		})
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		for (key, selector) in [
			("root_selector", &self.root_selector),
			("router_outlet", &self.router_outlet),
		] {
			if selector.trim().is_empty() {
				return Err(SettingsError::InvalidValue {
					key,
					message: "selector must not be empty".to_string(),
				});
			}
		}
		if self.list.page_scale == 0 {
			return Err(SettingsError::InvalidValue {
				key: "list.page_scale",
				message: "must be at least 1".to_string(),
			});
		}
		if self.list.pagination_window == 0 {
			return Err(SettingsError::InvalidValue {
				key: "list.pagination_window",
				message: "must be at least 1".to_string(),
			});
		}
		Ok(())
	}
}
