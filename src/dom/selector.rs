// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSS Selector parsing and matching
//!
//! Covers the subset of CSS that page scripts actually use to point at
//! links, buttons and forms: compound selectors, attribute operators, a
//! handful of pseudo-classes, the four combinators and selector lists.

use crate::error::{Error, Result};

use super::element::Element;
use super::node::NodeId;

/// A parsed CSS selector list (`a, b > c`)
#[derive(Debug, Clone)]
pub struct Selector {
    alternatives: Vec<ComplexSelector>,
}

/// Compound selectors joined by combinators, left to right
#[derive(Debug, Clone)]
struct ComplexSelector {
    compounds: Vec<Vec<SelectorPart>>,
    /// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

/// Combinator between selector parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant (space)
    Descendant,
    /// Child (>)
    Child,
    /// Adjacent sibling (+)
    AdjacentSibling,
    /// General sibling (~)
    GeneralSibling,
}

/// A part of a compound selector
#[derive(Debug, Clone)]
pub enum SelectorPart {
    /// Universal selector (*)
    Universal,
    /// Tag name
    Tag(String),
    /// ID selector (#id)
    Id(String),
    /// Class selector (.class)
    Class(String),
    /// Attribute selector ([attr], [attr=value], etc.)
    Attribute(AttributeSelector),
    /// Pseudo-class (:first-child, etc.)
    PseudoClass(PseudoClass),
}

/// Attribute selector
#[derive(Debug, Clone)]
pub struct AttributeSelector {
    pub name: String,
    pub operator: Option<AttributeOperator>,
    pub value: Option<String>,
    pub case_insensitive: bool,
}

/// Attribute selector operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// [attr=value] - exact match
    Equals,
    /// [attr~=value] - word in space-separated list
    Includes,
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch,
    /// [attr^=value] - starts with
    Prefix,
    /// [attr$=value] - ends with
    Suffix,
    /// [attr*=value] - contains substring
    Substring,
}

/// Pseudo-class selectors
#[derive(Debug, Clone)]
pub enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    Empty,
    Checked,
    Disabled,
    Enabled,
    Root,
    Not(Box<Selector>),
    /// Text content contains the given string
    Contains(String),
}

impl Selector {
    /// Parse a CSS selector string
    pub fn parse(selector: &str) -> Result<Self> {
        let trimmed = selector.trim();
        if trimmed.is_empty() {
            return Err(Error::selector(selector, "empty selector"));
        }

        SelectorParser::new(trimmed)
            .parse_list()
            .map_err(|reason| Error::selector(selector, reason))
    }

    /// Check if an element matches this selector
    pub fn matches(&self, element: &Element) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex.matches_at(complex.compounds.len() - 1, element))
    }
}

impl ComplexSelector {
    /// Match `compounds[..=idx]` with `compounds[idx]` anchored on `element`
    fn matches_at(&self, idx: usize, element: &Element) -> bool {
        if !self.compounds[idx]
            .iter()
            .all(|part| part_matches(part, element))
        {
            return false;
        }
        if idx == 0 {
            return true;
        }

        match self.combinators[idx - 1] {
            Combinator::Child => element
                .parent_element()
                .map_or(false, |p| self.matches_at(idx - 1, &p)),
            Combinator::Descendant => {
                let mut current = element.parent_element();
                while let Some(ancestor) = current {
                    if self.matches_at(idx - 1, &ancestor) {
                        return true;
                    }
                    current = ancestor.parent_element();
                }
                false
            }
            Combinator::AdjacentSibling => element
                .previous_element_sibling()
                .map_or(false, |s| self.matches_at(idx - 1, &s)),
            Combinator::GeneralSibling => {
                let mut current = element.previous_element_sibling();
                while let Some(sibling) = current {
                    if self.matches_at(idx - 1, &sibling) {
                        return true;
                    }
                    current = sibling.previous_element_sibling();
                }
                false
            }
        }
    }
}

/// Check if a selector part matches
fn part_matches(part: &SelectorPart, element: &Element) -> bool {
    match part {
        SelectorPart::Universal => true,
        SelectorPart::Tag(tag) => element.local_name().eq_ignore_ascii_case(tag),
        SelectorPart::Id(id) => element.data().attribute("id") == Some(id.as_str()),
        SelectorPart::Class(class) => element
            .data()
            .attribute("class")
            .map_or(false, |c| c.split_whitespace().any(|c| c == class)),
        SelectorPart::Attribute(attr) => attribute_matches(attr, element),
        SelectorPart::PseudoClass(pseudo) => pseudo_matches(pseudo, element),
    }
}

/// Check if attribute selector matches
fn attribute_matches(attr: &AttributeSelector, element: &Element) -> bool {
    let Some(value) = element.data().attribute(&attr.name) else {
        return false;
    };

    let (Some(op), Some(target)) = (&attr.operator, &attr.value) else {
        return true; // Just checking existence
    };

    let (value, target) = if attr.case_insensitive {
        (value.to_lowercase(), target.to_lowercase())
    } else {
        (value.to_string(), target.clone())
    };

    match op {
        AttributeOperator::Equals => value == target,
        AttributeOperator::Includes => value.split_whitespace().any(|w| w == target),
        AttributeOperator::DashMatch => {
            value == target || value.starts_with(&format!("{}-", target))
        }
        AttributeOperator::Prefix => !target.is_empty() && value.starts_with(&target),
        AttributeOperator::Suffix => !target.is_empty() && value.ends_with(&target),
        AttributeOperator::Substring => !target.is_empty() && value.contains(&target),
    }
}

/// Check if pseudo-class matches
fn pseudo_matches(pseudo: &PseudoClass, element: &Element) -> bool {
    match pseudo {
        PseudoClass::FirstChild => element.previous_element_sibling().is_none(),
        PseudoClass::LastChild => element.next_element_sibling().is_none(),
        PseudoClass::OnlyChild => {
            element.previous_element_sibling().is_none()
                && element.next_element_sibling().is_none()
        }
        PseudoClass::Empty => element.data().children.is_empty(),
        PseudoClass::Checked => element.has_attribute("checked") || element.has_attribute("selected"),
        PseudoClass::Disabled => element.has_attribute("disabled"),
        PseudoClass::Enabled => !element.has_attribute("disabled"),
        PseudoClass::Root => element.data().parent == Some(NodeId::ROOT),
        PseudoClass::Not(sel) => !sel.matches(element),
        PseudoClass::Contains(text) => element.text_content().contains(text.as_str()),
    }
}

type ParseResult<T> = std::result::Result<T, String>;

/// Simple selector parser
struct SelectorParser {
    input: Vec<char>,
    pos: usize,
}

impl SelectorParser {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse_list(&mut self) -> ParseResult<Selector> {
        let mut alternatives = vec![self.parse_complex()?];
        while self.peek() == Some(',') {
            self.advance();
            alternatives.push(self.parse_complex()?);
        }
        if let Some(c) = self.peek() {
            return Err(format!("unexpected '{}'", c));
        }
        Ok(Selector { alternatives })
    }

    fn parse_complex(&mut self) -> ParseResult<ComplexSelector> {
        self.skip_whitespace();
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::AdjacentSibling,
                Some('~') => Combinator::GeneralSibling,
                Some(_) if had_space => Combinator::Descendant,
                Some(c) => return Err(format!("unexpected '{}'", c)),
            };
            if combinator != Combinator::Descendant {
                self.advance();
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> ParseResult<Vec<SelectorPart>> {
        let mut parts = Vec::new();

        while let Some(c) = self.peek() {
            match c {
                '#' => {
                    self.advance();
                    parts.push(SelectorPart::Id(self.read_identifier()?));
                }
                '.' => {
                    self.advance();
                    parts.push(SelectorPart::Class(self.read_identifier()?));
                }
                '[' => parts.push(SelectorPart::Attribute(self.parse_attribute()?)),
                ':' => parts.push(SelectorPart::PseudoClass(self.parse_pseudo()?)),
                '*' => {
                    self.advance();
                    parts.push(SelectorPart::Universal);
                }
                c if c.is_alphabetic() || c == '_' || c == '-' => {
                    let tag = self.read_identifier()?;
                    parts.push(SelectorPart::Tag(tag.to_lowercase()));
                }
                _ => break,
            }
        }

        if parts.is_empty() {
            return Err("expected a selector".into());
        }
        Ok(parts)
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    /// Returns whether any whitespace was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().map_or(false, char::is_whitespace) {
            self.advance();
        }
        self.pos > start
    }

    fn read_identifier(&mut self) -> ParseResult<String> {
        let mut result = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                result.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if result.is_empty() {
            return Err("expected identifier".into());
        }
        Ok(result)
    }

    fn parse_attribute(&mut self) -> ParseResult<AttributeSelector> {
        self.advance(); // consume '['

        self.skip_whitespace();
        let name = self.read_identifier()?.to_lowercase();
        self.skip_whitespace();

        let mut operator = None;
        let mut value = None;
        let mut case_insensitive = false;

        if let Some(c) = self.peek() {
            if c != ']' {
                let op = match c {
                    '=' => AttributeOperator::Equals,
                    '~' => AttributeOperator::Includes,
                    '|' => AttributeOperator::DashMatch,
                    '^' => AttributeOperator::Prefix,
                    '$' => AttributeOperator::Suffix,
                    '*' => AttributeOperator::Substring,
                    _ => return Err(format!("unknown attribute operator '{}'", c)),
                };
                self.advance();
                if op != AttributeOperator::Equals {
                    self.expect('=')?;
                }
                operator = Some(op);

                self.skip_whitespace();
                value = Some(self.read_string_or_ident()?);
                self.skip_whitespace();

                if let Some('i') | Some('I') = self.peek() {
                    case_insensitive = true;
                    self.advance();
                    self.skip_whitespace();
                }
            }
        }

        self.expect(']')?;

        Ok(AttributeSelector {
            name,
            operator,
            value,
            case_insensitive,
        })
    }

    fn parse_pseudo(&mut self) -> ParseResult<PseudoClass> {
        self.advance(); // consume ':'

        let name = self.read_identifier()?;

        let pseudo = match name.to_lowercase().as_str() {
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "empty" => PseudoClass::Empty,
            "checked" => PseudoClass::Checked,
            "disabled" => PseudoClass::Disabled,
            "enabled" => PseudoClass::Enabled,
            "root" => PseudoClass::Root,
            "not" => {
                let inner = self.parse_function_arg()?;
                let sel = Selector::parse(&inner).map_err(|e| e.to_string())?;
                PseudoClass::Not(Box::new(sel))
            }
            "contains" => {
                let arg = self.parse_function_arg()?;
                PseudoClass::Contains(unquote(&arg).to_string())
            }
            other => return Err(format!("unsupported pseudo-class ':{}'", other)),
        };

        Ok(pseudo)
    }

    fn parse_function_arg(&mut self) -> ParseResult<String> {
        self.expect('(')?;
        let mut depth = 1;
        let mut quote: Option<char> = None;
        let mut result = String::new();

        while let Some(c) = self.advance() {
            match (quote, c) {
                (Some(q), c) if c == q => {
                    quote = None;
                    result.push(c);
                }
                (Some(_), c) => result.push(c),
                (None, '"') | (None, '\'') => {
                    quote = Some(c);
                    result.push(c);
                }
                (None, '(') => {
                    depth += 1;
                    result.push(c);
                }
                (None, ')') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(result.trim().to_string());
                    }
                    result.push(c);
                }
                (None, c) => result.push(c),
            }
        }

        Err("unterminated '('".into())
    }

    fn read_string_or_ident(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let mut result = String::new();
                while let Some(c) = self.advance() {
                    if c == quote {
                        return Ok(result);
                    }
                    if c == '\\' {
                        if let Some(escaped) = self.advance() {
                            result.push(escaped);
                        }
                    } else {
                        result.push(c);
                    }
                }
                Err("unterminated string".into())
            }
            _ => self.read_identifier(),
        }
    }

    fn expect(&mut self, expected: char) -> ParseResult<()> {
        match self.advance() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(format!("expected '{}', got '{}'", expected, c)),
            None => Err(format!("expected '{}', got end of input", expected)),
        }
    }
}

/// Strip one pair of matching quotes
fn unquote(s: &str) -> &str {
    let s = s.trim();
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    const PAGE: &str = r#"
        <div id="main" class="content wide">
            <form name="default" action="/go">
                <input type="text" name="age" disabled>
                <input type="submit" name="go" value="Go">
            </form>
            <a href="/page2">click</a>
            <a href="/page3" id="page3" data-kind="nav-main">no clicking</a>
        </div>
        <p>outside</p>
    "#;

    fn ids(selector: &str) -> Vec<String> {
        let doc = parse_html(PAGE).unwrap();
        doc.query_selector_all(selector)
            .unwrap()
            .into_iter()
            .map(|e| e.get_attribute("id").or(e.get_attribute("name")).unwrap_or_else(|| e.local_name().to_string()))
            .collect()
    }

    #[test]
    fn test_selector_parsing() {
        assert!(Selector::parse("div").is_ok());
        assert!(Selector::parse(".class").is_ok());
        assert!(Selector::parse("#id").is_ok());
        assert!(Selector::parse("[attr]").is_ok());
        assert!(Selector::parse("[attr=value]").is_ok());
        assert!(Selector::parse("div.class#id").is_ok());
        assert!(Selector::parse("form > input, a").is_ok());
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("[attr").is_err());
        assert!(Selector::parse("a:hover").is_err());
    }

    #[test]
    fn test_attribute_quoted() {
        assert_eq!(ids("[name='default']"), vec!["default"]);
        assert_eq!(ids("[data-kind|=nav]"), vec!["page3"]);
        assert_eq!(ids("[data-kind^=\"nav\"]"), vec!["page3"]);
        assert_eq!(ids("div[class~=wide]"), vec!["main"]);
    }

    #[test]
    fn test_combinators() {
        assert_eq!(ids("#main input"), vec!["age", "go"]);
        assert_eq!(ids("#main > input").len(), 0);
        assert_eq!(ids("form > input[type=submit]"), vec!["go"]);
        assert_eq!(ids("form + a"), vec!["a"]);
        assert_eq!(ids("form ~ a").len(), 2);
    }

    #[test]
    fn test_pseudo_classes() {
        assert_eq!(ids("a:contains('click')").len(), 2);
        assert_eq!(ids("a:contains(\"no clicking\")"), vec!["page3"]);
        assert_eq!(ids("input:disabled"), vec!["age"]);
        assert_eq!(ids("input:not([disabled])"), vec!["go"]);
        assert_eq!(ids("p, #page3"), vec!["page3", "p"]);
    }
}
