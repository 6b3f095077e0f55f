// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Document representation

use std::sync::Arc;

use url::Url;

use super::element::Element;
use super::node::{NodeId, NodeType, Tree};
use super::selector::Selector;
use crate::error::Result;

/// Immutable parsed HTML document
#[derive(Debug, Clone)]
pub struct Document {
    /// URL the document was fetched from
    pub url: Option<Url>,
    tree: Arc<Tree>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::from_tree(Tree::new(), None)
    }

    /// Create an empty document bound to a URL
    pub fn with_url(url: Url) -> Self {
        Self::from_tree(Tree::new(), Some(url))
    }

    pub(crate) fn from_tree(tree: Tree, url: Option<Url>) -> Self {
        Self {
            url,
            tree: Arc::new(tree),
        }
    }

    /// True when the document has no element at all
    pub fn is_empty(&self) -> bool {
        self.document_element().is_none()
    }

    /// Get the document element (<html>)
    pub fn document_element(&self) -> Option<Element> {
        self.tree
            .get(NodeId::ROOT)
            .children
            .iter()
            .find_map(|&id| Element::from_id(self.tree.clone(), id))
    }

    /// Get the <head> element
    pub fn head(&self) -> Option<Element> {
        self.document_element()?
            .children()
            .into_iter()
            .find(|e| e.local_name() == "head")
    }

    /// Get the <body> element
    pub fn body(&self) -> Option<Element> {
        self.document_element()?
            .children()
            .into_iter()
            .find(|e| e.local_name() == "body")
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.elements()
            .find(|e| e.local_name() == "title")
            .map(|e| e.text_content().trim().to_string())
            .unwrap_or_default()
    }

    /// Base URL for resolving relative references: the `<base href>` if
    /// present, otherwise the document URL
    pub fn base_url(&self) -> Option<Url> {
        let base_href = self
            .elements()
            .find(|e| e.local_name() == "base" && e.has_attribute("href"))
            .and_then(|e| e.href());

        match (base_href, &self.url) {
            (Some(href), Some(url)) => url.join(&href).ok().or_else(|| Some(url.clone())),
            (Some(href), None) => Url::parse(&href).ok(),
            (None, url) => url.clone(),
        }
    }

    /// Every element in document order
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        let mut stack: Vec<NodeId> = self.tree.get(NodeId::ROOT).children.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            while let Some(id) = stack.pop() {
                let node = self.tree.get(id);
                stack.extend(node.children.iter().rev().copied());
                if node.node_type == NodeType::Element {
                    return Element::from_id(self.tree.clone(), id);
                }
            }
            None
        })
    }

    /// Query selector - find first matching element
    pub fn query_selector(&self, selector: &str) -> Result<Option<Element>> {
        let sel = Selector::parse(selector)?;
        Ok(self.elements().find(|e| sel.matches(e)))
    }

    /// Query selector all - find all matching elements
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>> {
        let sel = Selector::parse(selector)?;
        Ok(self.elements().filter(|e| sel.matches(e)).collect())
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        self.elements().find(|e| e.id().as_deref() == Some(id))
    }

    /// Get the document's HTML
    pub fn outer_html(&self) -> String {
        self.tree.outer_html(NodeId::ROOT)
    }

    /// Get all text content
    pub fn text_content(&self) -> String {
        self.tree.text_content(NodeId::ROOT)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_html, parse_html_with_url};

    #[test]
    fn test_document_creation() {
        let doc = Document::new();
        assert!(doc.url.is_none());
        assert!(doc.title().is_empty());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_query_selector() {
        let doc = parse_html("<html><body><div id='test'>Hello</div></body></html>").unwrap();
        let elem = doc.get_element_by_id("test");
        assert!(elem.is_some());
        assert_eq!(elem.unwrap().text_content(), "Hello");
        assert!(doc.query_selector("#missing").unwrap().is_none());
    }

    #[test]
    fn test_base_url() {
        let url = Url::parse("http://example.com/a/b.html").unwrap();
        let doc = parse_html_with_url("<p>no base</p>", Some(url.clone())).unwrap();
        assert_eq!(doc.base_url(), Some(url.clone()));

        let doc = parse_html_with_url(
            "<head><base href='/static/'></head><p>x</p>",
            Some(url),
        )
        .unwrap();
        assert_eq!(doc.base_url().unwrap().as_str(), "http://example.com/static/");
    }
}
