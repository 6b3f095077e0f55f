// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! DOM Node types
//!
//! Parsed documents are stored as a flat, immutable arena of nodes. Handles
//! into the arena are an index plus a shared pointer, so they are cheap to
//! clone and safe to send across threads.

/// Index of a node inside its document arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The document root
    pub const ROOT: NodeId = NodeId(0);

    /// Get the raw index
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Document node
    Document,
    /// Element node (like <div>, <p>, etc.)
    Element,
    /// Text node
    Text,
    /// Comment node
    Comment,
    /// Document type node (<!DOCTYPE>)
    DocumentType,
}

/// Internal node data
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Node type
    pub node_type: NodeType,
    /// Tag name, lowercase (for elements)
    pub tag_name: Option<String>,
    /// Text content (for text/comment nodes)
    pub text: Option<String>,
    /// Attributes in source order (for elements)
    pub attributes: Vec<(String, String)>,
    /// Parent node
    pub parent: Option<NodeId>,
    /// Child nodes in document order
    pub children: Vec<NodeId>,
}

impl NodeData {
    fn blank(node_type: NodeType) -> Self {
        Self {
            node_type,
            tag_name: None,
            text: None,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create a new document node data
    pub fn document() -> Self {
        Self::blank(NodeType::Document)
    }

    /// Create a new doctype node data
    pub fn doctype() -> Self {
        Self::blank(NodeType::DocumentType)
    }

    /// Create a new element node data
    pub fn element(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: Some(tag_name.into().to_lowercase()),
            ..Self::blank(NodeType::Element)
        }
    }

    /// Create a new text node data
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            ..Self::blank(NodeType::Text)
        }
    }

    /// Create a new comment node data
    pub fn comment(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            ..Self::blank(NodeType::Comment)
        }
    }

    /// Look up an attribute by (case-insensitive) name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Arena holding every node of one document
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    /// Create a tree containing only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::document()],
        }
    }

    /// Append a node under `parent`, returning its id
    pub fn append(&mut self, parent: NodeId, mut data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        data.parent = Some(parent);
        self.nodes.push(data);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Get a node
    pub fn get(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root, so it is never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Collected text of a subtree
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let node = self.get(id);
        match node.node_type {
            NodeType::Text => out.push_str(node.text.as_deref().unwrap_or("")),
            NodeType::Element | NodeType::Document => {
                for &child in &node.children {
                    self.collect_text(child, out);
                }
            }
            _ => {}
        }
    }

    /// Serialize a subtree back to HTML
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize(id, &mut out);
        out
    }

    /// Serialize the children of a node
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in &self.get(id).children {
            self.serialize(child, &mut out);
        }
        out
    }

    fn serialize(&self, id: NodeId, out: &mut String) {
        let node = self.get(id);
        match node.node_type {
            NodeType::Text => out.push_str(node.text.as_deref().unwrap_or("")),
            NodeType::Comment => {
                out.push_str("<!--");
                out.push_str(node.text.as_deref().unwrap_or(""));
                out.push_str("-->");
            }
            NodeType::DocumentType => out.push_str("<!DOCTYPE html>"),
            NodeType::Document => {
                for &child in &node.children {
                    self.serialize(child, out);
                }
            }
            NodeType::Element => {
                let tag = node.tag_name.as_deref().unwrap_or("div");
                out.push('<');
                out.push_str(tag);
                for (k, v) in &node.attributes {
                    out.push(' ');
                    out.push_str(k);
                    if !v.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&html_escape(v));
                        out.push('"');
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }
                for &child in &node.children {
                    self.serialize(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_append() {
        let mut tree = Tree::new();
        let div = tree.append(NodeId::ROOT, NodeData::element("DIV"));
        tree.append(div, NodeData::text("Hello"));

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(div).tag_name.as_deref(), Some("div"));
        assert_eq!(tree.get(div).parent, Some(NodeId::ROOT));
        assert_eq!(tree.text_content(NodeId::ROOT), "Hello");
    }

    #[test]
    fn test_serialize_void_and_attributes() {
        let mut tree = Tree::new();
        let mut img = NodeData::element("img");
        img.attributes.push(("alt".into(), "a \"b\"".into()));
        tree.append(NodeId::ROOT, img);

        assert_eq!(tree.outer_html(NodeId::ROOT), "<img alt=\"a &quot;b&quot;\">");
    }
}
