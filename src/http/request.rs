// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

use crate::error::{Error, Result};

/// HTTP request representation
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Bytes>,
    /// Request timeout (None = transport default)
    pub timeout: Option<Duration>,
    /// Follow redirects
    pub follow_redirects: bool,
}

impl Request {
    /// Create a new request with arbitrary method
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
            follow_redirects: true,
        }
    }

    /// Create a new GET request
    pub fn get(url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::new(Method::GET, Url::parse(url.as_ref())?))
    }

    /// Create a new POST request
    pub fn post(url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::new(Method::POST, Url::parse(url.as_ref())?))
    }

    /// Create a new HEAD request
    pub fn head(url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::new(Method::HEAD, Url::parse(url.as_ref())?))
    }

    /// Set a header, replacing any existing values
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (name, value) = header_pair(name.as_ref(), value.as_ref())?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Append a header value, keeping existing ones
    pub fn append_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (name, value) = header_pair(name.as_ref(), value.as_ref())?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set follow redirects
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Get the URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }

    /// All values sent for a header, in insertion order
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }
}

/// Validate a header name/value pair
pub(crate) fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::try_from(name)
        .map_err(|e| Error::Config(format!("invalid header name '{}': {}", name, e)))?;
    let header_value = HeaderValue::try_from(value)
        .map_err(|e| Error::Config(format!("invalid value for header '{}': {}", name, e)))?;
    Ok((header_name, header_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_creation() {
        let req = Request::get("https://example.com/path").unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url.host_str(), Some("example.com"));
        assert!(req.follow_redirects);
    }

    #[test]
    fn test_request_headers() {
        let req = Request::get("https://example.com")
            .unwrap()
            .header("x-custom", "one")
            .unwrap()
            .append_header("x-custom", "two")
            .unwrap();
        assert_eq!(req.header_values("x-custom"), vec!["one", "two"]);

        let req = req.header("x-custom", "three").unwrap();
        assert_eq!(req.header_values("x-custom"), vec!["three"]);
    }

    #[test]
    fn test_invalid_header() {
        let err = Request::get("https://example.com")
            .unwrap()
            .header("bad header", "v")
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
