// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Element handles

use std::collections::HashMap;
use std::sync::Arc;

use super::node::{NodeData, NodeId, NodeType, Tree};
use super::selector::Selector;
use crate::error::Result;

/// Read-only handle to an element of a parsed document
#[derive(Debug, Clone)]
pub struct Element {
    tree: Arc<Tree>,
    id: NodeId,
}

impl Element {
    /// Create a handle if `id` refers to an element
    pub(crate) fn from_id(tree: Arc<Tree>, id: NodeId) -> Option<Self> {
        if tree.get(id).node_type == NodeType::Element {
            Some(Self { tree, id })
        } else {
            None
        }
    }

    pub(crate) fn data(&self) -> &NodeData {
        self.tree.get(self.id)
    }

    pub(crate) fn tree(&self) -> &Arc<Tree> {
        &self.tree
    }

    /// Arena id of this element
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// Get the tag name (uppercase)
    pub fn tag_name(&self) -> String {
        self.local_name().to_uppercase()
    }

    /// Get local name (lowercase)
    pub fn local_name(&self) -> &str {
        self.data().tag_name.as_deref().unwrap_or_default()
    }

    /// Get element ID
    pub fn id(&self) -> Option<String> {
        self.get_attribute("id")
    }

    /// Get class list as vector
    pub fn class_list(&self) -> Vec<String> {
        self.data()
            .attribute("class")
            .map(|c| c.split_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Check if element has a class
    pub fn has_class(&self, class: &str) -> bool {
        self.class_list().iter().any(|c| c == class)
    }

    /// Get an attribute
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.data().attribute(name).map(String::from)
    }

    /// Get an attribute, or an empty string
    pub fn attr_or_empty(&self, name: &str) -> String {
        self.get_attribute(name).unwrap_or_default()
    }

    /// Check if has attribute
    pub fn has_attribute(&self, name: &str) -> bool {
        self.data().attribute(name).is_some()
    }

    /// Get all attributes
    pub fn attributes(&self) -> HashMap<String, String> {
        self.data().attributes.iter().cloned().collect()
    }

    /// Get text content
    pub fn text_content(&self) -> String {
        self.tree.text_content(self.id)
    }

    /// Get inner HTML
    pub fn inner_html(&self) -> String {
        self.tree.inner_html(self.id)
    }

    /// Get outer HTML
    pub fn outer_html(&self) -> String {
        self.tree.outer_html(self.id)
    }

    /// Get parent element
    pub fn parent_element(&self) -> Option<Element> {
        self.data()
            .parent
            .and_then(|id| Element::from_id(self.tree.clone(), id))
    }

    /// Get child elements (only element nodes)
    pub fn children(&self) -> Vec<Element> {
        self.data()
            .children
            .iter()
            .filter_map(|&id| Element::from_id(self.tree.clone(), id))
            .collect()
    }

    /// Get previous sibling element
    pub fn previous_element_sibling(&self) -> Option<Element> {
        self.sibling_elements().0
    }

    /// Get next sibling element
    pub fn next_element_sibling(&self) -> Option<Element> {
        self.sibling_elements().1
    }

    fn sibling_elements(&self) -> (Option<Element>, Option<Element>) {
        let Some(parent) = self.data().parent else {
            return (None, None);
        };
        let siblings: Vec<NodeId> = self
            .tree
            .get(parent)
            .children
            .iter()
            .copied()
            .filter(|&id| self.tree.get(id).node_type == NodeType::Element)
            .collect();
        let Some(pos) = siblings.iter().position(|&id| id == self.id) else {
            return (None, None);
        };
        let prev = pos
            .checked_sub(1)
            .and_then(|p| Element::from_id(self.tree.clone(), siblings[p]));
        let next = siblings
            .get(pos + 1)
            .and_then(|&id| Element::from_id(self.tree.clone(), id));
        (prev, next)
    }

    /// Query selector - first matching descendant
    pub fn query_selector(&self, selector: &str) -> Result<Option<Element>> {
        let sel = Selector::parse(selector)?;
        Ok(self.descendants().find(|e| sel.matches(e)))
    }

    /// Query selector all - every matching descendant in document order
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>> {
        let sel = Selector::parse(selector)?;
        Ok(self.descendants().filter(|e| sel.matches(e)).collect())
    }

    /// Descendant elements in document order, excluding self
    pub fn descendants(&self) -> impl Iterator<Item = Element> + '_ {
        let mut stack: Vec<NodeId> = self.data().children.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            while let Some(id) = stack.pop() {
                let node = self.tree.get(id);
                stack.extend(node.children.iter().rev().copied());
                if node.node_type == NodeType::Element {
                    return Some(Element {
                        tree: self.tree.clone(),
                        id,
                    });
                }
            }
            None
        })
    }

    /// Check if element matches a selector
    pub fn matches(&self, selector: &str) -> Result<bool> {
        Ok(Selector::parse(selector)?.matches(self))
    }

    /// Get closest ancestor-or-self matching selector
    pub fn closest(&self, selector: &str) -> Result<Option<Element>> {
        let sel = Selector::parse(selector)?;
        let mut current = Some(self.clone());
        while let Some(elem) = current {
            if sel.matches(&elem) {
                return Ok(Some(elem));
            }
            current = elem.parent_element();
        }
        Ok(None)
    }

    /// Check if this element contains another
    pub fn contains(&self, other: &Element) -> bool {
        let mut current = other.parent_element();
        while let Some(parent) = current {
            if parent == *self {
                return true;
            }
            current = parent.parent_element();
        }
        false
    }

    /// Check if checkbox/radio is checked
    pub fn checked(&self) -> bool {
        self.has_attribute("checked")
    }

    /// Check if element is disabled
    pub fn disabled(&self) -> bool {
        self.has_attribute("disabled")
    }

    /// Get href for links
    pub fn href(&self) -> Option<String> {
        self.get_attribute("href")
    }

    /// Get src for images, scripts, etc.
    pub fn src(&self) -> Option<String> {
        self.get_attribute("src")
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.tree, &other.tree)
    }
}

impl Eq for Element {}

#[cfg(test)]
mod tests {
    use crate::dom::parse_html;

    #[test]
    fn test_element_class_list() {
        let doc = parse_html("<div class=\"foo bar baz\">test</div>").unwrap();
        let div = doc.query_selector("div").unwrap().unwrap();
        let classes = div.class_list();
        assert_eq!(classes, vec!["foo", "bar", "baz"]);
        assert!(div.has_class("bar"));
    }

    #[test]
    fn test_closest_and_contains() {
        let doc = parse_html(
            "<form id='f'><fieldset><input name='q'></fieldset></form>",
        )
        .unwrap();
        let input = doc.query_selector("input").unwrap().unwrap();
        let form = input.closest("form").unwrap().unwrap();

        assert_eq!(form.id().as_deref(), Some("f"));
        assert!(form.contains(&input));
        assert!(!input.contains(&form));
    }

    #[test]
    fn test_siblings() {
        let doc = parse_html("<ul><li id='a'>1</li> <li id='b'>2</li></ul>").unwrap();
        let a = doc.query_selector("#a").unwrap().unwrap();
        let b = a.next_element_sibling().unwrap();

        assert_eq!(b.id().as_deref(), Some("b"));
        assert_eq!(b.previous_element_sibling(), Some(a));
        assert!(b.next_element_sibling().is_none());
    }
}
