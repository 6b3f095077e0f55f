// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for Skiff
//!
//! Request/response types, the `Transport` seam the browser talks through,
//! a reqwest implementation of it and the session cookie store.

mod client;
mod cookie;
mod request;
mod response;

pub use client::{HttpClient, HttpClientConfig, Transport};
pub use cookie::{Cookie, CookieJar, SameSite};
pub(crate) use request::header_pair;
pub use request::Request;
pub use response::{BodyStream, Response, StreamingResponse};

/// Header names the browser sets itself
pub mod headers {
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const USER_AGENT: &str = "user-agent";
    pub const REFERER: &str = "referer";
    pub const AUTHORIZATION: &str = "authorization";

    /// Headers a server expects at most once; only the last accumulated
    /// value is transmitted
    pub const SINGLE_VALUED: &[&str] = &[
        "authorization",
        "content-length",
        "content-type",
        "from",
        "host",
        "if-modified-since",
        "if-unmodified-since",
        "max-forwards",
        "proxy-authorization",
        "referer",
        "user-agent",
    ];

    /// Whether `name` must be sent with a single value
    pub fn is_single_valued(name: &str) -> bool {
        SINGLE_VALUED
            .iter()
            .any(|h| h.eq_ignore_ascii_case(name))
    }
}


#[cfg(test)]
mod tests {
    use super::headers::is_single_valued;

    #[test]
    fn test_single_valued_headers() {
        assert!(is_single_valued("User-Agent"));
        assert!(is_single_valued("referer"));
        assert!(!is_single_valued("accept"));
        assert!(!is_single_valued("x-custom"));
    }
}
