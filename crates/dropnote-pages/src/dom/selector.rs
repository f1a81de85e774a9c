//! CSS selector subset for the in-memory DOM.
//!
//! Supported: type and universal selectors, `#id`, `.class`, `[attr]`,
//! `[attr=value]` (quoted or bare), descendant and child (`>`) combinators,
//! and comma-separated lists. Anything else is rejected.

use super::DomError;
use super::memory::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
	Descendant,
	Child,
}

#[derive(Debug, Default)]
struct Compound {
	tag: Option<String>,
	id: Option<String>,
	classes: Vec<String>,
	attributes: Vec<(String, Option<String>)>,
}

impl Compound {
	fn matches(&self, element: &Element) -> bool {
		if let Some(tag) = &self.tag
			&& *tag != element.tag_name()
		{
			return false;
		}
		if let Some(id) = &self.id
			&& element.get_attribute("id").as_deref() != Some(id.as_str())
		{
			return false;
		}
		if !self.classes.iter().all(|class| element.has_class(class)) {
			return false;
		}
		self.attributes
			.iter()
			.all(|(name, expected)| match (element.get_attribute(name), expected) {
				(None, _) => false,
				(Some(_), None) => true,
				(Some(actual), Some(expected)) => actual == *expected,
			})
	}
}

/// One complex selector; each compound carries the combinator linking it to
/// the compound before it.
#[derive(Debug)]
struct Complex {
	parts: Vec<(Combinator, Compound)>,
}

impl Complex {
	fn matches(&self, element: &Element) -> bool {
		matches_from(&self.parts, self.parts.len() - 1, element)
	}
}

fn matches_from(parts: &[(Combinator, Compound)], index: usize, element: &Element) -> bool {
	let (combinator, compound) = &parts[index];
	if !compound.matches(element) {
		return false;
	}
	if index == 0 {
		return true;
	}
	match combinator {
		Combinator::Child => element
			.parent()
			.is_some_and(|parent| matches_from(parts, index - 1, &parent)),
		Combinator::Descendant => {
			let mut ancestor = element.parent();
			while let Some(candidate) = ancestor {
				if matches_from(parts, index - 1, &candidate) {
					return true;
				}
				ancestor = candidate.parent();
			}
			false
		}
	}
}

/// A parsed, comma-separated selector list.
#[derive(Debug)]
pub(super) struct SelectorList {
	selectors: Vec<Complex>,
}

impl SelectorList {
	pub(super) fn parse(input: &str) -> Result<Self, DomError> {
		let mut parser = Parser {
			chars: input.chars().collect(),
			pos: 0,
		};
		parser
			.parse_list()
			.map(|selectors| Self { selectors })
			.ok_or_else(|| DomError::InvalidSelector(input.to_string()))
	}

	pub(super) fn matches(&self, element: &Element) -> bool {
		self.selectors.iter().any(|selector| selector.matches(element))
	}
}

struct Parser {
	chars: Vec<char>,
	pos: usize,
}

impl Parser {
	fn peek(&self) -> Option<char> {
		self.chars.get(self.pos).copied()
	}

	fn bump(&mut self) -> Option<char> {
		let c = self.peek()?;
		self.pos += 1;
		Some(c)
	}

	fn skip_whitespace(&mut self) -> bool {
		let start = self.pos;
		while self.peek().is_some_and(char::is_whitespace) {
			self.pos += 1;
		}
		self.pos > start
	}

	fn parse_list(&mut self) -> Option<Vec<Complex>> {
		let mut list = vec![self.parse_complex()?];
		while self.peek() == Some(',') {
			self.pos += 1;
			list.push(self.parse_complex()?);
		}
		self.peek().is_none().then_some(list)
	}

	fn parse_complex(&mut self) -> Option<Complex> {
		self.skip_whitespace();
		let mut parts = vec![(Combinator::Descendant, self.parse_compound()?)];
		loop {
			let spaced = self.skip_whitespace();
			match self.peek() {
				None | Some(',') => break,
				Some('>') => {
					self.pos += 1;
					self.skip_whitespace();
					parts.push((Combinator::Child, self.parse_compound()?));
				}
				Some(_) if spaced => parts.push((Combinator::Descendant, self.parse_compound()?)),
				Some(_) => return None,
			}
		}
		Some(Complex { parts })
	}

	fn parse_compound(&mut self) -> Option<Compound> {
		let mut compound = Compound::default();
		let mut consumed = false;
		match self.peek() {
			Some('*') => {
				self.pos += 1;
				consumed = true;
			}
			Some(c) if is_ident_char(c) => {
				compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
				consumed = true;
			}
			_ => {}
		}
		loop {
			match self.peek() {
				Some('#') => {
					self.pos += 1;
					compound.id = Some(self.parse_ident()?);
				}
				Some('.') => {
					self.pos += 1;
					compound.classes.push(self.parse_ident()?);
				}
				Some('[') => {
					self.pos += 1;
					compound.attributes.push(self.parse_attribute()?);
				}
				_ => break,
			}
			consumed = true;
		}
		consumed.then_some(compound)
	}

	fn parse_attribute(&mut self) -> Option<(String, Option<String>)> {
		self.skip_whitespace();
		let name = self.parse_ident()?;
		self.skip_whitespace();
		match self.bump()? {
			']' => Some((name, None)),
			'=' => {
				self.skip_whitespace();
				let value = match self.peek()? {
					quote @ ('"' | '\'') => {
						self.pos += 1;
						let mut value = String::new();
						loop {
							let c = self.bump()?;
							if c == quote {
								break;
							}
							value.push(c);
						}
						value
					}
					_ => self.parse_ident()?,
				};
				self.skip_whitespace();
				(self.bump()? == ']').then_some((name, Some(value)))
			}
			_ => None,
		}
	}

	fn parse_ident(&mut self) -> Option<String> {
		let start = self.pos;
		while self.peek().is_some_and(is_ident_char) {
			self.pos += 1;
		}
		(self.pos > start).then(|| self.chars[start..self.pos].iter().collect())
	}
}

fn is_ident_char(c: char) -> bool {
	c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn tree() -> Element {
		let root = Element::new("div");
		root.set_inner_html(
			r#"<section id="paste-list"><ul class="items"><li class="item selected" data-id="7"><a href="/detail?id=7" data-link="true">seven</a></li></ul></section><p class="item">loose</p>"#,
		);
		root
	}

	#[rstest]
	#[case("li", Some("seven"))]
	#[case("#paste-list a", Some("seven"))]
	#[case("ul > li.item.selected", Some("seven"))]
	#[case("section > li", None)]
	#[case("section li", Some("seven"))]
	#[case("[data-id=\"7\"]", Some("seven"))]
	#[case("[data-id='8']", None)]
	#[case("a[data-link]", Some("seven"))]
	#[case("p.item", Some("loose"))]
	#[case("*.item", Some("seven"))]
	#[case("em, p", Some("loose"))]
	fn test_query_selector_cases(#[case] selector: &str, #[case] expected: Option<&str>) {
		// Arrange
		let root = tree();

		// Act
		let found = root.query_selector(selector).unwrap();

		// Assert
		assert_eq!(found.map(|el| el.text_content()).as_deref(), expected);
	}

	#[rstest]
	#[case("")]
	#[case("li:hover")]
	#[case("[data-id")]
	#[case("ul >")]
	#[case("a,,b")]
	fn test_invalid_selectors_are_rejected(#[case] selector: &str) {
		// Act
		let result = SelectorList::parse(selector);

		// Assert
		assert!(matches!(result, Err(DomError::InvalidSelector(_))));
	}

	#[rstest]
	fn test_query_selector_all_returns_document_order() {
		// Arrange
		let root = tree();

		// Act
		let items = root.query_selector_all(".item").unwrap();

		// Assert
		let texts: Vec<String> = items.iter().map(Element::text_content).collect();
		assert_eq!(texts, vec!["seven".to_string(), "loose".to_string()]);
	}
}
