// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Resources referenced by a page
//!
//! Every descriptor carries an absolute URL resolved against the page's base
//! URL when it is extracted, so it stays downloadable after the browser has
//! moved on.

use std::sync::Arc;

use url::Url;

use crate::dom::{Document, Element};

/// Kind of a downloadable asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    Link,
    Image,
    Stylesheet,
    Script,
}

/// A resolved reference to something a page points at
pub trait Asset: Send + Sync {
    /// Value of the element's id attribute, empty if absent
    fn id(&self) -> &str;

    /// Absolute URL
    fn url(&self) -> &Url;

    fn asset_type(&self) -> AssetType;
}

/// An `<a href>` link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: String,
    pub url: Url,
    /// Trimmed text of the anchor
    pub text: String,
}

/// An `<img src>` image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub id: String,
    pub url: Url,
    pub alt: String,
    pub title: String,
}

/// A `<link rel="stylesheet">` stylesheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub id: String,
    pub url: Url,
    /// Defaults to `all`
    pub media: String,
    /// Defaults to `text/css`
    pub content_type: String,
}

/// A `<script src>` script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub id: String,
    pub url: Url,
    /// Defaults to `text/javascript`
    pub content_type: String,
}

macro_rules! impl_asset {
    ($ty:ty, $kind:expr) => {
        impl Asset for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn url(&self) -> &Url {
                &self.url
            }

            fn asset_type(&self) -> AssetType {
                $kind
            }
        }
    };
}

impl_asset!(Link, AssetType::Link);
impl_asset!(Image, AssetType::Image);
impl_asset!(Stylesheet, AssetType::Stylesheet);
impl_asset!(Script, AssetType::Script);

impl<T: Asset + ?Sized> Asset for Arc<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn url(&self) -> &Url {
        (**self).url()
    }

    fn asset_type(&self) -> AssetType {
        (**self).asset_type()
    }
}

impl Link {
    pub fn new(url: Url, id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url,
            text: text.into(),
        }
    }
}

impl Image {
    pub fn new(
        url: Url,
        id: impl Into<String>,
        alt: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url,
            alt: alt.into(),
            title: title.into(),
        }
    }
}

impl Stylesheet {
    /// Empty media or type fall back to the defaults
    pub fn new(url: Url, id: impl Into<String>, media: &str, content_type: &str) -> Self {
        Self {
            id: id.into(),
            url,
            media: or_default(media, "all"),
            content_type: or_default(content_type, "text/css"),
        }
    }
}

impl Script {
    /// Empty type falls back to the default
    pub fn new(url: Url, id: impl Into<String>, content_type: &str) -> Self {
        Self {
            id: id.into(),
            url,
            content_type: or_default(content_type, "text/javascript"),
        }
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.trim().to_string()
    }
}

/// Resolve an element attribute against `base`, skipping unparsable references
fn resolve(element: &Element, attr: &str, base: &Url) -> Option<Url> {
    let reference = element.get_attribute(attr)?;
    match base.join(reference.trim()) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::trace!(reference = %reference, error = %e, "Skipping unresolvable asset");
            None
        }
    }
}

fn select(doc: &Document, selector: &str) -> Vec<Element> {
    doc.query_selector_all(selector).unwrap_or_default()
}

/// Every `<a href>` in document order
pub fn links(doc: &Document, base: &Url) -> Vec<Link> {
    select(doc, "a[href]")
        .iter()
        .filter_map(|e| {
            let url = resolve(e, "href", base)?;
            Some(Link::new(url, e.attr_or_empty("id"), e.text_content().trim()))
        })
        .collect()
}

/// Every `<img src>` in document order
pub fn images(doc: &Document, base: &Url) -> Vec<Image> {
    select(doc, "img[src]")
        .iter()
        .filter_map(|e| {
            let url = resolve(e, "src", base)?;
            Some(Image::new(
                url,
                e.attr_or_empty("id"),
                e.attr_or_empty("alt"),
                e.attr_or_empty("title"),
            ))
        })
        .collect()
}

/// Every `<link rel="stylesheet" href>` in document order
pub fn stylesheets(doc: &Document, base: &Url) -> Vec<Stylesheet> {
    select(doc, "link[rel~='stylesheet' i][href]")
        .iter()
        .filter_map(|e| {
            let url = resolve(e, "href", base)?;
            Some(Stylesheet::new(
                url,
                e.attr_or_empty("id"),
                &e.attr_or_empty("media"),
                &e.attr_or_empty("type"),
            ))
        })
        .collect()
}

/// Every `<script src>` in document order; inline scripts are skipped
pub fn scripts(doc: &Document, base: &Url) -> Vec<Script> {
    select(doc, "script[src]")
        .iter()
        .filter_map(|e| {
            let url = resolve(e, "src", base)?;
            Some(Script::new(
                url,
                e.attr_or_empty("id"),
                &e.attr_or_empty("type"),
            ))
        })
        .collect()
}
