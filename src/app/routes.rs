//! The application route table.

use dropnote_pages::RouteConfig;

use super::contact_page::ContactPage;
use super::detail_page::DetailCodePage;
use super::list_page::{ListPage, ListPageProps};
use super::main_page::MainPage;
use crate::settings::AppSettings;

/// Routes in matching priority order.
pub fn route_table(settings: &AppSettings) -> Vec<RouteConfig> {
	let list = ListPageProps {
		page_scale: settings.list.page_scale,
		pagination_window: settings.list.pagination_window,
	};
	vec![
		RouteConfig::new::<MainPage>("/").named("MainPage").exact(true),
		RouteConfig::with_props::<ListPage>("/list", list).named("ListPage"),
		RouteConfig::new::<DetailCodePage>("/detail").named("DetailCodePage"),
		RouteConfig::new::<ContactPage>("/about").named("ContactPage"),
	]
}
