// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Read-only DOM for parsed pages
//!
//! Built on top of html5ever, flattened into a shared arena so parsed pages
//! can be kept in history and handed between tasks.

mod document;
mod element;
mod node;
mod parser;
mod selector;

pub use document::Document;
pub use element::Element;
pub use node::{NodeData, NodeId, NodeType, Tree};
pub use parser::{parse_bytes, parse_html, parse_html_with_url};
pub use selector::Selector;
