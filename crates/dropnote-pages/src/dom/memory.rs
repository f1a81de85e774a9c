//! In-memory DOM used on native targets.
//!
//! Markup handed to [`Element::set_inner_html`] is parsed with `scraper` and
//! converted into a mutable tree of reference-counted nodes. Events bubble
//! from the target through its ancestors the way browser events do.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use scraper::{ElementRef, Html};

use super::DomError;
use super::selector::SelectorList;

const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

type Handler = Rc<RefCell<dyn FnMut(&Event)>>;

struct Listener {
	event_type: String,
	handler: Handler,
	signal: AbortSignal,
}

enum Node {
	Element(Element),
	Text(String),
}

struct ElementData {
	tag: String,
	attributes: RefCell<Vec<(String, String)>>,
	children: RefCell<Vec<Node>>,
	parent: RefCell<Weak<ElementData>>,
	listeners: RefCell<Vec<Listener>>,
}

/// A node in the in-memory tree. Clones share the same node.
#[derive(Clone)]
pub struct Element {
	data: Rc<ElementData>,
}

impl PartialEq for Element {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.data, &other.data)
	}
}

impl Eq for Element {}

impl std::fmt::Debug for Element {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Element")
			.field("tag", &self.data.tag)
			.field("attributes", &*self.data.attributes.borrow())
			.finish_non_exhaustive()
	}
}

thread_local! {
	static DOCUMENT: Element = Element::new("body");
}

/// The body of this thread's document.
pub fn document() -> Element {
	DOCUMENT.with(Element::clone)
}

/// Runs `document.querySelector(selector)`.
pub fn document_query(selector: &str) -> Result<Option<Element>, DomError> {
	document().query_selector(selector)
}

impl Element {
	/// Creates a detached element.
	pub fn new(tag: &str) -> Self {
		Self {
			data: Rc::new(ElementData {
				tag: tag.to_ascii_lowercase(),
				attributes: RefCell::new(Vec::new()),
				children: RefCell::new(Vec::new()),
				parent: RefCell::new(Weak::new()),
				listeners: RefCell::new(Vec::new()),
			}),
		}
	}

	pub fn tag_name(&self) -> String {
		self.data.tag.clone()
	}

	pub fn parent(&self) -> Option<Element> {
		self.data
			.parent
			.borrow()
			.upgrade()
			.map(|data| Element { data })
	}

	pub fn inner_html(&self) -> String {
		let mut out = String::new();
		for child in self.data.children.borrow().iter() {
			serialize_node(child, &mut out);
		}
		out
	}

	/// Replaces every child with the parsed `html`.
	pub fn set_inner_html(&self, html: &str) {
		self.replace_children(parse_fragment(html));
	}

	pub fn text_content(&self) -> String {
		let mut out = String::new();
		collect_text(self, &mut out);
		out
	}

	pub fn set_text_content(&self, text: &str) {
		let nodes = if text.is_empty() {
			Vec::new()
		} else {
			vec![Node::Text(text.to_string())]
		};
		self.replace_children(nodes);
	}

	/// Appends a detached element as the last child.
	pub fn append_child(&self, child: &Element) {
		*child.data.parent.borrow_mut() = Rc::downgrade(&self.data);
		self.data
			.children
			.borrow_mut()
			.push(Node::Element(child.clone()));
	}

	pub fn get_attribute(&self, name: &str) -> Option<String> {
		self.data
			.attributes
			.borrow()
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.clone())
	}

	pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
		let mut attributes = self.data.attributes.borrow_mut();
		match attributes.iter_mut().find(|(key, _)| key == name) {
			Some((_, existing)) => *existing = value.to_string(),
			None => attributes.push((name.to_string(), value.to_string())),
		}
		Ok(())
	}

	pub fn remove_attribute(&self, name: &str) -> Result<(), DomError> {
		self.data
			.attributes
			.borrow_mut()
			.retain(|(key, _)| key != name);
		Ok(())
	}

	pub fn has_class(&self, class: &str) -> bool {
		self.get_attribute("class")
			.is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
	}

	pub fn add_class(&self, class: &str) -> Result<(), DomError> {
		if self.has_class(class) {
			return Ok(());
		}
		let mut classes: Vec<String> = self
			.get_attribute("class")
			.map(|value| value.split_whitespace().map(str::to_string).collect())
			.unwrap_or_default();
		classes.push(class.to_string());
		self.set_attribute("class", &classes.join(" "))
	}

	pub fn remove_class(&self, class: &str) -> Result<(), DomError> {
		let Some(value) = self.get_attribute("class") else {
			return Ok(());
		};
		let classes: Vec<&str> = value.split_whitespace().filter(|c| *c != class).collect();
		self.set_attribute("class", &classes.join(" "))
	}

	/// Reads one inline style property.
	pub fn style(&self, property: &str) -> Option<String> {
		parse_style(&self.get_attribute("style").unwrap_or_default())
			.into_iter()
			.find(|(name, _)| name == property)
			.map(|(_, value)| value)
	}

	/// Sets one inline style property. An empty value removes it.
	pub fn set_style(&self, property: &str, value: &str) -> Result<(), DomError> {
		let mut declarations = parse_style(&self.get_attribute("style").unwrap_or_default());
		declarations.retain(|(name, _)| name != property);
		if !value.is_empty() {
			declarations.push((property.to_string(), value.to_string()));
		}
		let serialized: Vec<String> = declarations
			.iter()
			.map(|(name, value)| format!("{name}: {value};"))
			.collect();
		self.set_attribute("style", &serialized.join(" "))
	}

	/// Form control value: the `value` attribute, or the text of a textarea.
	pub fn value(&self) -> Option<String> {
		match self.data.tag.as_str() {
			"textarea" => Some(
				self.get_attribute("value")
					.unwrap_or_else(|| self.text_content()),
			),
			"input" | "select" | "option" | "button" => {
				Some(self.get_attribute("value").unwrap_or_default())
			}
			_ => None,
		}
	}

	pub fn set_value(&self, value: &str) -> Result<(), DomError> {
		self.set_attribute("value", value)
	}

	pub fn query_selector(&self, selector: &str) -> Result<Option<Element>, DomError> {
		let selector = SelectorList::parse(selector)?;
		let mut found = None;
		self.walk_descendants(&mut |element: &Element| {
			if selector.matches(element) {
				found = Some(element.clone());
				return false;
			}
			true
		});
		Ok(found)
	}

	pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, DomError> {
		let selector = SelectorList::parse(selector)?;
		let mut found = Vec::new();
		self.walk_descendants(&mut |element: &Element| {
			if selector.matches(element) {
				found.push(element.clone());
			}
			true
		});
		Ok(found)
	}

	/// Nearest inclusive ancestor matching `selector`.
	pub fn closest(&self, selector: &str) -> Result<Option<Element>, DomError> {
		let selector = SelectorList::parse(selector)?;
		let mut current = Some(self.clone());
		while let Some(element) = current {
			if selector.matches(&element) {
				return Ok(Some(element));
			}
			current = element.parent();
		}
		Ok(None)
	}

	/// Registers `handler` for `event_type` until `signal` is aborted.
	pub fn add_event_listener<F>(
		&self,
		event_type: &str,
		handler: F,
		signal: &AbortSignal,
	) -> Result<EventListener, DomError>
	where
		F: FnMut(&Event) + 'static,
	{
		if signal.is_aborted() {
			return Ok(EventListener { _private: () });
		}
		let handler: Handler = Rc::new(RefCell::new(handler));
		self.data.listeners.borrow_mut().push(Listener {
			event_type: event_type.to_string(),
			handler,
			signal: signal.clone(),
		});
		Ok(EventListener { _private: () })
	}

	/// Number of live listeners attached directly to this element.
	pub fn listener_count(&self) -> usize {
		self.prune_listeners();
		self.data.listeners.borrow().len()
	}

	/// Dispatches a bubbling event with this element as the target.
	pub fn dispatch(&self, event_type: &str) -> Event {
		let event = Event {
			state: Rc::new(EventState {
				event_type: event_type.to_string(),
				target: self.clone(),
				default_prevented: Cell::new(false),
				propagation_stopped: Cell::new(false),
			}),
		};
		let mut current = Some(self.clone());
		while let Some(element) = current {
			element.prune_listeners();
			let handlers: Vec<Handler> = element
				.data
				.listeners
				.borrow()
				.iter()
				.filter(|listener| listener.event_type == event_type)
				.map(|listener| listener.handler.clone())
				.collect();
			for handler in handlers {
				if let Ok(mut handler) = handler.try_borrow_mut() {
					(*handler)(&event);
				}
			}
			if event.state.propagation_stopped.get() {
				break;
			}
			current = element.parent();
		}
		event
	}

	/// Shorthand for dispatching `click`.
	pub fn click(&self) -> Event {
		self.dispatch("click")
	}

	fn prune_listeners(&self) {
		self.data
			.listeners
			.borrow_mut()
			.retain(|listener| !listener.signal.is_aborted());
	}

	fn replace_children(&self, nodes: Vec<Node>) {
		for node in &nodes {
			if let Node::Element(child) = node {
				*child.data.parent.borrow_mut() = Rc::downgrade(&self.data);
			}
		}
		let previous = std::mem::replace(&mut *self.data.children.borrow_mut(), nodes);
		for node in previous {
			if let Node::Element(child) = node {
				*child.data.parent.borrow_mut() = Weak::new();
			}
		}
	}

	fn child_elements(&self) -> Vec<Element> {
		self.data
			.children
			.borrow()
			.iter()
			.filter_map(|node| match node {
				Node::Element(element) => Some(element.clone()),
				Node::Text(_) => None,
			})
			.collect()
	}

	/// Pre-order walk; `visit` returns `false` to stop.
	fn walk_descendants(&self, visit: &mut dyn FnMut(&Element) -> bool) -> bool {
		for child in self.child_elements() {
			if !visit(&child) || !child.walk_descendants(visit) {
				return false;
			}
		}
		true
	}
}

struct EventState {
	event_type: String,
	target: Element,
	default_prevented: Cell<bool>,
	propagation_stopped: Cell<bool>,
}

/// An event travelling through the in-memory tree.
#[derive(Clone)]
pub struct Event {
	state: Rc<EventState>,
}

impl Event {
	pub fn event_type(&self) -> String {
		self.state.event_type.clone()
	}

	pub fn target(&self) -> Option<Element> {
		Some(self.state.target.clone())
	}

	pub fn prevent_default(&self) {
		self.state.default_prevented.set(true);
	}

	pub fn default_prevented(&self) -> bool {
		self.state.default_prevented.get()
	}

	pub fn stop_propagation(&self) {
		self.state.propagation_stopped.set(true);
	}
}

impl std::fmt::Debug for Event {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Event")
			.field("type", &self.state.event_type)
			.field("default_prevented", &self.default_prevented())
			.finish_non_exhaustive()
	}
}

/// Registration returned by [`Element::add_event_listener`].
///
/// The in-memory tree owns its handlers, so this carries nothing; removal
/// happens through the signal.
#[derive(Debug)]
pub struct EventListener {
	_private: (),
}

/// Shared abort flag observed by listeners.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
	aborted: Rc<Cell<bool>>,
}

impl AbortSignal {
	pub fn is_aborted(&self) -> bool {
		self.aborted.get()
	}
}

/// Owner side of an [`AbortSignal`].
#[derive(Debug, Default)]
pub struct AbortController {
	signal: AbortSignal,
}

impl AbortController {
	pub fn new() -> Result<Self, DomError> {
		Ok(Self::default())
	}

	pub fn signal(&self) -> AbortSignal {
		self.signal.clone()
	}

	pub fn abort(&self) {
		self.signal.aborted.set(true);
	}
}

fn parse_fragment(html: &str) -> Vec<Node> {
	if html.is_empty() {
		return Vec::new();
	}
	let fragment = Html::parse_fragment(html);
	convert_children(fragment.root_element())
}

fn convert_children(source: ElementRef<'_>) -> Vec<Node> {
	let mut nodes = Vec::new();
	for child in source.children() {
		if let Some(element) = ElementRef::wrap(child) {
			nodes.push(Node::Element(convert_element(element)));
		} else if let Some(text) = child.value().as_text() {
			let text: &str = text;
			nodes.push(Node::Text(text.to_string()));
		}
	}
	nodes
}

fn convert_element(source: ElementRef<'_>) -> Element {
	let element = Element::new(source.value().name());
	element.data.attributes.replace(
		source
			.value()
			.attrs()
			.map(|(name, value)| (name.to_string(), value.to_string()))
			.collect(),
	);
	element.replace_children(convert_children(source));
	element
}

fn serialize_node(node: &Node, out: &mut String) {
	match node {
		Node::Text(text) => out.push_str(&escape_text(text)),
		Node::Element(element) => {
			let data = &element.data;
			out.push('<');
			out.push_str(&data.tag);
			for (name, value) in data.attributes.borrow().iter() {
				out.push(' ');
				out.push_str(name);
				out.push_str("=\"");
				out.push_str(&escape_attribute(value));
				out.push('"');
			}
			out.push('>');
			if VOID_ELEMENTS.contains(&data.tag.as_str()) {
				return;
			}
			for child in data.children.borrow().iter() {
				serialize_node(child, out);
			}
			out.push_str("</");
			out.push_str(&data.tag);
			out.push('>');
		}
	}
}

fn collect_text(element: &Element, out: &mut String) {
	for child in element.data.children.borrow().iter() {
		match child {
			Node::Text(text) => out.push_str(text),
			Node::Element(element) => collect_text(element, out),
		}
	}
}

fn escape_text(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
	value.replace('&', "&amp;").replace('"', "&quot;")
}

fn parse_style(style: &str) -> Vec<(String, String)> {
	style
		.split(';')
		.filter_map(|declaration| {
			let (name, value) = declaration.split_once(':')?;
			let name = name.trim();
			(!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
		})
		.collect()
}
