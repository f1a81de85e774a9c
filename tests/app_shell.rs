//! Integration tests for the application shell
//!
//! These tests launch the whole app into the in-memory document and drive it
//! through clicks:
//! 1. Startup renders the header and the main page
//! 2. The counter button
//! 3. Header navigation to the paste list and pagination
//! 4. Opening a paste
//! 5. Launch without a root element and shutdown

use dropnote::app::{MemoryPasteSource, Paste, PasteService};
use dropnote::pages::dom::{self, Element};
use dropnote::pages::platform::clock;
use dropnote::pages::spawn::run_until_stalled;
use dropnote::{AppSettings, current_app, launch, shutdown};
use rstest::*;
use serial_test::serial;

fn pastes(count: usize) -> Vec<Paste> {
	(1..=count)
		.map(|id| Paste {
			id: format!("p{id}"),
			title: Some(format!("paste {id}")),
			language: "rust".to_string(),
			created_at: "2026-01-01".to_string(),
			expires_at: "2026-02-01".to_string(),
		})
		.collect()
}

fn query(selector: &str) -> Option<Element> {
	dom::document_query(selector).ok().flatten()
}

fn click(selector: &str) {
	let element = query(selector).unwrap_or_else(|| panic!("{selector} not rendered"));
	element.click();
	run_until_stalled();
}

fn current_path() -> String {
	current_app()
		.and_then(|app| app.component().router())
		.map(|router| router.current_path())
		.unwrap_or_default()
}

#[fixture]
fn launched() -> Element {
	shutdown();
	clock::reset();
	let document = dom::document();
	document.set_inner_html(r#"<div id="app"></div>"#);
	let service = PasteService::new(MemoryPasteSource::new(pastes(25)));
	launch(AppSettings::default(), service);
	run_until_stalled();
	document
}

#[rstest]
#[serial(app)]
fn test_launch_renders_header_and_main_page(launched: Element) {
	// Assert
	assert!(query("#app-header #home-navigation").is_some());
	let home = query("#home-navigation").unwrap();
	assert!(home.has_class("text-white"));
	assert_eq!(query("#count-display").unwrap().text_content(), "0");
	assert!(launched.query_selector("#router-provider #test-button").unwrap().is_some());
	assert_eq!(current_path(), "/");
}

#[rstest]
#[serial(app)]
fn test_counter_button_increments(#[from(launched)] _app: Element) {
	// Act
	click("#test-button");
	click("#test-button");

	// Assert
	assert_eq!(query("#count-display").unwrap().text_content(), "2");
}

#[rstest]
#[serial(app)]
fn test_header_navigates_to_list_and_paginates(#[from(launched)] _app: Element) {
	// Act
	click("#list-navigation");

	// Assert
	assert_eq!(current_path(), "/list");
	assert!(query("#count-display").is_none());
	assert!(query("#list-navigation").unwrap().has_class("text-white"));
	assert!(!query("#home-navigation").unwrap().has_class("text-white"));
	let rows = dom::document()
		.query_selector_all("button[data-paste-id]")
		.unwrap();
	assert_eq!(rows.len(), 10);
	let pages = dom::document()
		.query_selector_all("button[data-pagination-id]")
		.unwrap();
	assert_eq!(pages.len(), 3);

	// Act
	click(r#"button[data-pagination-id="3"]"#);

	// Assert
	let rows = dom::document()
		.query_selector_all("button[data-paste-id]")
		.unwrap();
	assert_eq!(rows.len(), 5);
	assert_eq!(rows[0].get_attribute("data-paste-id").as_deref(), Some("p21"));
	assert!(
		query(r#"button[data-pagination-id="3"]"#)
			.unwrap()
			.has_class("bg-amber-200")
	);
}

#[rstest]
#[serial(app)]
fn test_paste_row_opens_detail(#[from(launched)] _app: Element) {
	// Arrange
	click("#list-navigation");

	// Act
	click(r#"button[data-paste-id="p4"]"#);

	// Assert
	assert_eq!(current_path(), "/detail?id=p4");
	assert_eq!(query("#paste-id").unwrap().text_content(), "p4");
	assert!(query("button[data-paste-id]").is_none());
}

#[rstest]
#[serial(app)]
fn test_about_page_is_reachable(#[from(launched)] _app: Element) {
	// Act
	click("#contact-navigation");

	// Assert
	assert_eq!(current_path(), "/about");
	assert!(query("#contact-navigation").unwrap().has_class("text-white"));
	assert!(query("#count-display").is_none());
}

#[rstest]
#[serial(app)]
fn test_shutdown_unmounts_app() {
	// Arrange
	clock::reset();
	dom::document().set_inner_html(r#"<div id="app"></div>"#);
	launch(AppSettings::default(), PasteService::empty());
	run_until_stalled();
	let router = current_app()
		.and_then(|app| app.component().router())
		.unwrap();

	// Act
	shutdown();

	// Assert
	assert!(current_app().is_none());
	assert!(router.is_destroyed());
	assert_eq!(query("#app").unwrap().inner_html(), "");
}

#[rstest]
#[serial(app)]
fn test_launch_without_root_mounts_nothing() {
	// Arrange
	shutdown();
	dom::document().set_inner_html(r#"<div id="elsewhere"></div>"#);

	// Act
	launch(AppSettings::default(), PasteService::empty());
	run_until_stalled();

	// Assert
	assert!(current_app().is_none());
	assert_eq!(query("#elsewhere").unwrap().inner_html(), "");
	assert!(query("#app-header").is_none());
}
