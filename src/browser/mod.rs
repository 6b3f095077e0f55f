// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser session, forms and assets
//!
//! High-level API for scripted browsing: open pages, walk history, fill in
//! forms and fetch what the pages reference.

pub mod assets;
mod browser;
mod config;
mod download;
mod form;
mod state;

pub use assets::{Asset, AssetType, Image, Link, Script, Stylesheet};
pub use browser::Browser;
pub use config::{Attribute, BrowserConfig};
pub use download::{AsyncDownloadChannel, AsyncDownloadResult, Downloader};
pub use form::{FieldKind, Form, FormField, FormFields, SubmitButton, FORM_URLENCODED};
pub use state::State;
