// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Skiff - Programmable Headless Web Client
//!
//! Issues HTTP requests, parses the returned HTML and exposes each page as a
//! navigable model so code can browse a site the way a user would: follow
//! links, fill in and submit forms, walk back through history, bookmark
//! pages and download assets. No JavaScript, no rendering.
//!
//! ## Features
//!
//! - Session state: history stack, persistent headers, cookies, user agent
//! - Forms: field extraction, validated input, browser-accurate submission
//! - Assets: links, images, stylesheets and scripts with resolved URLs
//! - Downloads: direct or in background tasks reporting over a channel
//! - Bookmarks: in-memory or JSON file storage
//! - CSS selectors over an immutable, thread-safe DOM
//!
//! ## Example
//!
//! ```rust,no_run
//! use skiff::{Browser, BrowserConfig};
//!
//! #[tokio::main]
//! async fn main() -> skiff::Result<()> {
//!     let mut browser = Browser::new(BrowserConfig::default())?;
//!     browser.open("https://example.com/login").await?;
//!
//!     let mut form = browser.form("form#login")?;
//!     form.input("user", "alice")?;
//!     form.input("password", "secret")?;
//!     form.click("submit").await?;
//!
//!     println!("{} -> {}", browser.url()?, browser.title()?);
//!     for link in browser.links()? {
//!         println!("  {}", link.url);
//!     }
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod browser;
pub mod dom;
pub mod error;
pub mod http;
pub mod jar;

// Browser
pub use browser::{Attribute, Browser, BrowserConfig, State};

// Forms
pub use browser::{FieldKind, Form, FormField, FormFields, SubmitButton};

// Assets and downloads
pub use browser::{Asset, AssetType, Image, Link, Script, Stylesheet};
pub use browser::{AsyncDownloadChannel, AsyncDownloadResult, Downloader};

// Agent
pub use agent::UserAgent;

// DOM
pub use dom::{Document, Element, Selector};

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{
    Cookie, CookieJar, HttpClient, HttpClientConfig, Request, Response, StreamingResponse, Transport,
};

// Storage
pub use jar::{BookmarksJar, FileBookmarks, History, MemoryBookmarks};

/// Skiff version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
