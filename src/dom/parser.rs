// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML parser using html5ever

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use url::Url;

use super::document::Document;
use super::node::{NodeData, NodeId, Tree};
use crate::error::{Error, Result};

/// Parse HTML string into a Document
pub fn parse_html(html: &str) -> Result<Document> {
    parse_bytes(html.as_bytes(), None)
}

/// Parse HTML string with the URL it was fetched from
pub fn parse_html_with_url(html: &str, url: Option<Url>) -> Result<Document> {
    parse_bytes(html.as_bytes(), url)
}

/// Parse a raw response body. Invalid UTF-8 is replaced, not rejected.
pub fn parse_bytes(mut body: &[u8], url: Option<Url>) -> Result<Document> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut body)
        .map_err(|e| Error::parse(format!("failed to read document: {}", e)))?;

    let mut tree = Tree::new();
    for child in dom.document.children.borrow().iter() {
        convert_node(&mut tree, child, NodeId::ROOT, false);
    }

    Ok(Document::from_tree(tree, url))
}

/// Elements whose whitespace-only text is content
const PRESERVE_WHITESPACE: &[&str] = &["pre", "textarea", "listing", "plaintext"];

/// Copy an html5ever node and its subtree into the arena.
///
/// `preserve` is set below elements that keep their whitespace.
fn convert_node(tree: &mut Tree, handle: &Handle, parent: NodeId, mut preserve: bool) {
    let data = match handle.data {
        RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return,
        RcNodeData::Doctype { .. } => NodeData::doctype(),
        RcNodeData::Text { ref contents } => {
            let text = contents.borrow().to_string();
            // indentation runs carry nothing; a lone space may separate words
            if !preserve && text.len() > 1 && text.bytes().all(|b| b.is_ascii_whitespace()) {
                return;
            }
            NodeData::text(text)
        }
        RcNodeData::Comment { ref contents } => NodeData::comment(contents.to_string()),
        RcNodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            preserve |= PRESERVE_WHITESPACE.contains(&&*name.local);
            let mut data = NodeData::element(name.local.to_string());
            data.attributes = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            data
        }
    };

    let id = tree.append(parent, data);
    for child in handle.children.borrow().iter() {
        convert_node(tree, child, id, preserve);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_html() {
        let doc = parse_html("<html><body><p>Hello</p></body></html>").unwrap();
        assert!(doc.body().is_some());
        assert_eq!(doc.text_content(), "Hello");
    }

    #[test]
    fn test_parse_with_attributes() {
        let doc = parse_html("<div id=\"test\" class=\"foo bar\">content</div>").unwrap();
        let div = doc.query_selector("div").unwrap().unwrap();
        assert_eq!(div.get_attribute("id"), Some("test".to_string()));
        assert!(div.has_class("foo"));
    }

    #[test]
    fn test_parse_invalid_utf8_is_lossy() {
        let doc = parse_bytes(b"<title>caf\xe9</title>", None).unwrap();
        assert!(doc.title().starts_with("caf"));
    }

    #[test]
    fn test_parse_keeps_form_controls() {
        let html = r#"<!DOCTYPE html>
            <html>
            <head><title>Login</title></head>
            <body>
                <form id="login" action="/session" method="post">
                    <input type="text" name="user" value="">
                    <input type="password" name="password">
                    <select name="lang"><option value="en" selected>English</option></select>
                    <textarea name="note">hi  there</textarea>
                    <input type="submit" name="go" value="Sign in">
                </form>
            </body>
            </html>"#;
        let url = Url::parse("http://localhost/login").unwrap();
        let doc = parse_html_with_url(html, Some(url.clone())).unwrap();

        assert_eq!(doc.title(), "Login");
        assert_eq!(doc.url.as_ref(), Some(&url));

        let form = doc.query_selector("form#login").unwrap().unwrap();
        assert_eq!(form.get_attribute("method"), Some("post".to_string()));
        assert_eq!(doc.query_selector_all("form [name]").unwrap().len(), 5);

        let note = doc.query_selector("textarea").unwrap().unwrap();
        assert_eq!(note.text_content(), "hi  there");
    }

    #[test]
    fn test_whitespace_kept_where_it_is_content() {
        let doc = parse_html(
            "<body>\n  <textarea name=\"t\">\n  </textarea><pre>   </pre><p>&nbsp;</p>\n  </body>",
        )
        .unwrap();

        let textarea = doc.query_selector("textarea").unwrap().unwrap();
        assert_eq!(textarea.text_content(), "  ");
        let pre = doc.query_selector("pre").unwrap().unwrap();
        assert_eq!(pre.text_content(), "   ");
        let p = doc.query_selector("p").unwrap().unwrap();
        assert_eq!(p.text_content(), "\u{a0}");

        let body = doc.body().unwrap();
        assert_eq!(body.children().len(), 3);
    }
}
