// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Snapshot of one navigation result

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::dom::{parse_bytes, Document};
use crate::error::Result;
use crate::http::Response;

/// Immutable result of a single navigation
#[derive(Debug, Clone)]
pub struct State {
    /// Method of the request that produced this state
    pub method: Method,
    /// Final URL after redirects
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub document: Document,
}

impl State {
    /// Build a state from a response, parsing the body as HTML
    pub fn from_response(method: Method, response: Response) -> Result<Self> {
        let document = parse_bytes(&response.body, Some(response.url.clone()))?;
        Ok(Self::with_document(method, response, document))
    }

    /// Build a state without parsing the body (HEAD)
    pub fn without_document(method: Method, response: Response) -> Self {
        let document = Document::with_url(response.url.clone());
        Self::with_document(method, response, document)
    }

    fn with_document(method: Method, response: Response, document: Document) -> Self {
        Self {
            method,
            url: response.url,
            status: response.status,
            headers: response.headers,
            body: response.body,
            document,
        }
    }

    /// Base URL for resolving references found on this page
    pub fn base_url(&self) -> Url {
        self.document.base_url().unwrap_or_else(|| self.url.clone())
    }
}
