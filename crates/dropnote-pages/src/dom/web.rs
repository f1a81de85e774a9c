//! Browser DOM backend over `web_sys`.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::DomError;

/// A live DOM element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
	inner: web_sys::Element,
}

impl From<web_sys::Element> for Element {
	fn from(inner: web_sys::Element) -> Self {
		Self { inner }
	}
}

impl AsRef<web_sys::Element> for Element {
	fn as_ref(&self) -> &web_sys::Element {
		&self.inner
	}
}

/// Runs `document.querySelector(selector)`.
pub fn document_query(selector: &str) -> Result<Option<Element>, DomError> {
	let document = web_sys::window()
		.ok_or(DomError::NoWindow)?
		.document()
		.ok_or(DomError::NoDocument)?;
	document
		.query_selector(selector)
		.map(|found| found.map(Element::from))
		.map_err(|_| DomError::InvalidSelector(selector.to_string()))
}

impl Element {
	pub fn tag_name(&self) -> String {
		self.inner.local_name()
	}

	pub fn parent(&self) -> Option<Element> {
		self.inner.parent_element().map(Element::from)
	}

	pub fn inner_html(&self) -> String {
		self.inner.inner_html()
	}

	pub fn set_inner_html(&self, html: &str) {
		self.inner.set_inner_html(html);
	}

	pub fn text_content(&self) -> String {
		self.inner.text_content().unwrap_or_default()
	}

	pub fn set_text_content(&self, text: &str) {
		self.inner.set_text_content(Some(text));
	}

	pub fn get_attribute(&self, name: &str) -> Option<String> {
		self.inner.get_attribute(name)
	}

	pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
		self.inner
			.set_attribute(name, value)
			.map_err(DomError::from_js)
	}

	pub fn remove_attribute(&self, name: &str) -> Result<(), DomError> {
		self.inner.remove_attribute(name).map_err(DomError::from_js)
	}

	pub fn has_class(&self, class: &str) -> bool {
		self.inner.class_list().contains(class)
	}

	pub fn add_class(&self, class: &str) -> Result<(), DomError> {
		self.inner
			.class_list()
			.add_1(class)
			.map_err(DomError::from_js)
	}

	pub fn remove_class(&self, class: &str) -> Result<(), DomError> {
		self.inner
			.class_list()
			.remove_1(class)
			.map_err(DomError::from_js)
	}

	pub fn style(&self, property: &str) -> Option<String> {
		let html = self.inner.dyn_ref::<web_sys::HtmlElement>()?;
		html.style()
			.get_property_value(property)
			.ok()
			.filter(|value| !value.is_empty())
	}

	pub fn set_style(&self, property: &str, value: &str) -> Result<(), DomError> {
		let Some(html) = self.inner.dyn_ref::<web_sys::HtmlElement>() else {
			return Err(DomError::Operation(format!(
				"<{}> has no inline style",
				self.tag_name()
			)));
		};
		let style = html.style();
		if value.is_empty() {
			style
				.remove_property(property)
				.map(|_| ())
				.map_err(DomError::from_js)
		} else {
			style
				.set_property(property, value)
				.map_err(DomError::from_js)
		}
	}

	pub fn value(&self) -> Option<String> {
		if let Some(input) = self.inner.dyn_ref::<web_sys::HtmlInputElement>() {
			return Some(input.value());
		}
		if let Some(textarea) = self.inner.dyn_ref::<web_sys::HtmlTextAreaElement>() {
			return Some(textarea.value());
		}
		self.inner
			.dyn_ref::<web_sys::HtmlSelectElement>()
			.map(web_sys::HtmlSelectElement::value)
	}

	pub fn set_value(&self, value: &str) -> Result<(), DomError> {
		if let Some(input) = self.inner.dyn_ref::<web_sys::HtmlInputElement>() {
			input.set_value(value);
		} else if let Some(textarea) = self.inner.dyn_ref::<web_sys::HtmlTextAreaElement>() {
			textarea.set_value(value);
		} else if let Some(select) = self.inner.dyn_ref::<web_sys::HtmlSelectElement>() {
			select.set_value(value);
		} else {
			return self.set_attribute("value", value);
		}
		Ok(())
	}

	pub fn query_selector(&self, selector: &str) -> Result<Option<Element>, DomError> {
		self.inner
			.query_selector(selector)
			.map(|found| found.map(Element::from))
			.map_err(|_| DomError::InvalidSelector(selector.to_string()))
	}

	pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, DomError> {
		let list = self
			.inner
			.query_selector_all(selector)
			.map_err(|_| DomError::InvalidSelector(selector.to_string()))?;
		Ok((0..list.length())
			.filter_map(|index| list.item(index))
			.filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
			.map(Element::from)
			.collect())
	}

	pub fn closest(&self, selector: &str) -> Result<Option<Element>, DomError> {
		self.inner
			.closest(selector)
			.map(|found| found.map(Element::from))
			.map_err(|_| DomError::InvalidSelector(selector.to_string()))
	}

	/// Registers `handler` for `event_type` until `signal` is aborted.
	///
	/// The returned [`EventListener`] owns the JS closure and must outlive the
	/// registration.
	pub fn add_event_listener<F>(
		&self,
		event_type: &str,
		mut handler: F,
		signal: &AbortSignal,
	) -> Result<EventListener, DomError>
	where
		F: FnMut(&Event) + 'static,
	{
		let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
			handler(&Event { inner: event });
		}) as Box<dyn FnMut(web_sys::Event)>);
		let options = web_sys::AddEventListenerOptions::new();
		options.set_signal(&signal.inner);
		self.inner
			.add_event_listener_with_callback_and_add_event_listener_options(
				event_type,
				closure.as_ref().unchecked_ref(),
				&options,
			)
			.map_err(DomError::from_js)?;
		Ok(EventListener { _closure: closure })
	}
}

/// A browser event.
#[derive(Debug, Clone)]
pub struct Event {
	inner: web_sys::Event,
}

impl Event {
	pub fn event_type(&self) -> String {
		self.inner.type_()
	}

	pub fn target(&self) -> Option<Element> {
		self.inner
			.target()
			.and_then(|target| target.dyn_into::<web_sys::Element>().ok())
			.map(Element::from)
	}

	pub fn prevent_default(&self) {
		self.inner.prevent_default();
	}

	pub fn default_prevented(&self) -> bool {
		self.inner.default_prevented()
	}

	pub fn stop_propagation(&self) {
		self.inner.stop_propagation();
	}
}

/// Keeps a listener's closure alive until it is dropped.
pub struct EventListener {
	_closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl std::fmt::Debug for EventListener {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventListener").finish_non_exhaustive()
	}
}

/// Wrapper around the browser `AbortSignal`.
#[derive(Debug, Clone)]
pub struct AbortSignal {
	inner: web_sys::AbortSignal,
}

impl AbortSignal {
	pub fn is_aborted(&self) -> bool {
		self.inner.aborted()
	}
}

/// Wrapper around the browser `AbortController`.
#[derive(Debug)]
pub struct AbortController {
	inner: web_sys::AbortController,
}

impl AbortController {
	pub fn new() -> Result<Self, DomError> {
		web_sys::AbortController::new()
			.map(|inner| Self { inner })
			.map_err(DomError::from_js)
	}

	pub fn signal(&self) -> AbortSignal {
		AbortSignal {
			inner: self.inner.signal(),
		}
	}

	pub fn abort(&self) {
		self.inner.abort();
	}
}
