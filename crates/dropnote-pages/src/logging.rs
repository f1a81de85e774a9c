//! Logging abstraction layer for dropnote-pages
//!
//! These macros route to the browser console on WASM and to `tracing` on
//! native targets, so the same call sites work in the browser and under
//! `cargo test`.
//!
//! ## Macro Overview
//!
//! | Macro | Gate | WASM | Non-WASM |
//! |-------|------|------|----------|
//! | `debug_log!` | `debug-hooks` + `debug_assertions` | `console.debug` | `tracing::debug!` |
//! | `info_log!` | `debug_assertions` on WASM | `console.info` | `tracing::info!` |
//! | `warn_log!` | `debug_assertions` on WASM | `console.warn` | `tracing::warn!` |
//! | `error_log!` | none | `console.error` | `tracing::error!` |
//!
//! ## Example
//!
//! ```ignore
//! use dropnote_pages::{debug_log, error_log, info_log, warn_log};
//!
//! debug_log!("scheduled update for {}", name);
//! info_log!("Component mounted");
//! warn_log!("{} is already mounted", name);
//! error_log!("Route mount failed: {}", error);
//! ```

/// Logs a debug message (requires `debug-hooks` feature + `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks", target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::debug_1(&format!($($arg)*).into());
	}};
}

/// Logs a debug message (requires `debug-hooks` feature + `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks", not(target_arch = "wasm32")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::debug!($($arg)*);
	}};
}

/// No-op debug_log when conditions are not met
#[macro_export]
#[cfg(not(all(debug_assertions, feature = "debug-hooks")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message
///
/// On WASM this compiles to a no-op in release builds. Native builds leave
/// filtering to the installed `tracing` subscriber.
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::info_1(&format!($($arg)*).into());
	}};
}

/// No-op info_log in release WASM builds
#[macro_export]
#[cfg(all(not(debug_assertions), target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message through `tracing`
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::info!($($arg)*);
	}};
}

/// Logs a warning message
///
/// Used for guarded misuse such as mounting twice or unmounting a component
/// that was never mounted.
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::warn_1(&format!($($arg)*).into());
	}};
}

/// No-op warn_log in release WASM builds
#[macro_export]
#[cfg(all(not(debug_assertions), target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{}};
}

/// Logs a warning message through `tracing`
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::warn!($($arg)*);
	}};
}

/// Logs an error message
///
/// Errors are reported in every build profile: a failed route mount or a
/// missing root container must stay visible in production.
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::error_1(&format!($($arg)*).into());
	}};
}

/// Logs an error message through `tracing`
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::error!($($arg)*);
	}};
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	#[rstest]
	fn test_logging_macros_compile() {
		// Act
		crate::debug_log!("debug {}", 1);
		crate::info_log!("info {}", "two");
		crate::warn_log!("warn {:?}", Some(3));
		crate::error_log!("error");
	}

	#[rstest]
	fn test_logging_macros_accept_named_arguments() {
		// Arrange
		let name = "Header";

		// Act
		crate::warn_log!("{name} is already mounted");
		crate::error_log!("{} failed: {reason}", name, reason = "boom");
	}
}
