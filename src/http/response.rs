// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport responses

use std::time::Duration;

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use url::Url;

use super::headers;
use crate::error::Result;

/// Body chunks in arrival order; an `Err` ends the body early
pub type BodyStream = BoxStream<'static, Result<Bytes>>;

/// What a `Transport` hands back for one request.
///
/// The body is fully buffered. `url` is the final URL once redirects have
/// been followed.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub url: Url,
    /// Wall time spent in the transport
    pub elapsed: Duration,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes, url: Url) -> Self {
        Self {
            status,
            headers,
            body,
            url,
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// First value of `name`, if it is valid visible ASCII
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Every value of `name` in arrival order
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Media type without parameters, lowercased (`text/html`)
    pub fn mime_type(&self) -> Option<String> {
        let value = self.header(headers::CONTENT_TYPE)?;
        let essence = value.split(';').next().unwrap_or_default().trim();
        (!essence.is_empty()).then(|| essence.to_ascii_lowercase())
    }

    /// Raw `Set-Cookie` values
    pub fn set_cookies(&self) -> Vec<&str> {
        self.header_all(reqwest::header::SET_COOKIE.as_str())
    }
}

/// A response whose body is still arriving.
///
/// Status and headers are known; the body is consumed chunk by chunk.
pub struct StreamingResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub url: Url,
    pub body: BodyStream,
}

impl StreamingResponse {
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Declared Content-Length, if any
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }
}

impl From<Response> for StreamingResponse {
    /// Replay a buffered response as a single-chunk stream
    fn from(response: Response) -> Self {
        let body = response.body;
        Self {
            status: response.status,
            headers: response.headers,
            url: response.url,
            body: stream::once(async move { Ok(body) }).boxed(),
        }
    }
}

impl std::fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}
