// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session cookie store

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use reqwest::header::{HeaderMap, SET_COOKIE};
use serde::{Deserialize, Serialize};
use url::{Host, Url};

use super::response::Response;

/// A cookie received from a server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Host or domain the cookie is sent to
    pub domain: String,
    pub path: String,
    /// None for session cookies
    pub expires: Option<DateTime<Utc>>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    /// Set without a Domain attribute; only the exact host matches
    #[serde(default)]
    pub host_only: bool,
}

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
    #[default]
    None,
    Lax,
    Strict,
}

impl Cookie {
    /// Create a session cookie valid for every path
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: "/".to_string(),
            expires: None,
            secure: false,
            http_only: false,
            same_site: SameSite::default(),
            host_only: false,
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set secure flag
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp <= Utc::now())
    }

    /// Whether the cookie should be sent to `url`
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or("");
        if !self.domain_matches(host) {
            return false;
        }
        if !path_matches(&self.path, url.path()) {
            return false;
        }
        if self.secure && url.scheme() != "https" {
            return false;
        }
        !self.is_expired()
    }

    fn domain_matches(&self, host: &str) -> bool {
        if self.domain.is_empty() {
            return true;
        }
        let domain = self.domain.trim_start_matches('.');
        if self.host_only {
            return host.eq_ignore_ascii_case(domain);
        }
        host.eq_ignore_ascii_case(domain)
            || host
                .to_ascii_lowercase()
                .ends_with(&format!(".{}", domain.to_ascii_lowercase()))
    }

    /// Parse a Set-Cookie header value received from `url`
    pub fn parse(header: &str, url: &Url) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.trim().split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Cookie::new(name, value.trim().trim_matches('"'));
        cookie.domain = url.host_str().unwrap_or("").to_string();
        cookie.host_only = true;
        cookie.path = default_path(url);

        let mut max_age = None;
        for part in parts {
            let part = part.trim();
            let (attr, val) = match part.split_once('=') {
                Some((a, v)) => (a.trim().to_ascii_lowercase(), v.trim()),
                None => (part.to_ascii_lowercase(), ""),
            };
            match attr.as_str() {
                "domain" if !val.is_empty() => {
                    cookie.domain = val.trim_start_matches('.').to_ascii_lowercase();
                    cookie.host_only = false;
                }
                "path" if val.starts_with('/') => cookie.path = val.to_string(),
                "expires" => {
                    if let Ok(dt) = DateTime::parse_from_rfc2822(val) {
                        cookie.expires = Some(dt.with_timezone(&Utc));
                    }
                }
                "max-age" => max_age = val.parse::<i64>().ok(),
                "samesite" => {
                    cookie.same_site = match val.to_ascii_lowercase().as_str() {
                        "strict" => SameSite::Strict,
                        "lax" => SameSite::Lax,
                        _ => SameSite::None,
                    };
                }
                "secure" => cookie.secure = true,
                "httponly" => cookie.http_only = true,
                _ => {}
            }
        }

        if !cookie.host_only && !domain_allowed(url, &cookie.domain) {
            tracing::debug!(
                name = %cookie.name,
                domain = %cookie.domain,
                host = url.host_str().unwrap_or(""),
                "Rejecting cookie for foreign domain"
            );
            return None;
        }

        // Max-Age wins over Expires
        if let Some(secs) = max_age {
            cookie.expires = Some(Utc::now() + chrono::Duration::seconds(secs));
        }

        Some(cookie)
    }

    /// `name=value` as sent in a Cookie header
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Whether a response from `url` may set a cookie for `domain`.
///
/// The host must be the domain itself or one of its subdomains. IP hosts
/// only accept their own address, and single-label domains are refused
/// unless they name the host.
fn domain_allowed(url: &Url, domain: &str) -> bool {
    let host = match url.host() {
        Some(Host::Domain(host)) => host.to_ascii_lowercase(),
        Some(Host::Ipv4(addr)) => return domain == addr.to_string(),
        Some(Host::Ipv6(addr)) => return domain.trim_matches(['[', ']']) == addr.to_string(),
        None => return false,
    };
    if host == domain {
        return true;
    }
    domain.contains('.') && host.ends_with(&format!(".{}", domain))
}

fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    if cookie_path == request_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/')
            || request_path[cookie_path.len()..].starts_with('/'))
}

/// Directory of the request path, used when Set-Cookie carries no Path
fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

/// Thread-safe cookie storage, shared by clones
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    /// Cookies keyed by domain
    cookies: Arc<DashMap<String, Vec<Cookie>>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie, replacing one with the same name and path.
    /// An already expired cookie deletes its counterpart.
    pub fn add(&self, cookie: Cookie) {
        let mut entry = self.cookies.entry(cookie.domain.clone()).or_default();
        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);
        if !cookie.is_expired() {
            entry.push(cookie);
        }
    }

    /// Add a cookie from a Set-Cookie header
    pub fn add_from_header(&self, header: &str, url: &Url) {
        if let Some(cookie) = Cookie::parse(header, url) {
            self.add(cookie);
        }
    }

    /// Store every Set-Cookie header of a response, returns how many were accepted
    pub fn store_from_response(&self, response: &Response) -> usize {
        self.store_from_headers(&response.headers, &response.url)
    }

    /// Store every Set-Cookie header received from `url`
    pub fn store_from_headers(&self, headers: &HeaderMap, url: &Url) -> usize {
        let mut stored = 0;
        for header in headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
        {
            if let Some(cookie) = Cookie::parse(header, url) {
                tracing::trace!(name = %cookie.name, domain = %cookie.domain, "Storing cookie");
                self.add(cookie);
                stored += 1;
            }
        }
        stored
    }

    /// Cookies that apply to `url`, longest path first
    pub fn get_cookies(&self, url: &Url) -> Vec<Cookie> {
        self.remove_expired();

        let mut result: Vec<Cookie> = self
            .cookies
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|c| c.matches(url))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        result.sort_by(|a, b| b.path.len().cmp(&a.path.len()).then(a.name.cmp(&b.name)));
        result
    }

    /// Cookie header value for `url`, if any cookie applies
    pub fn get_cookie_header(&self, url: &Url) -> Option<String> {
        let cookies = self.get_cookies(url);
        if cookies.is_empty() {
            return None;
        }
        Some(
            cookies
                .iter()
                .map(Cookie::to_header_value)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Remove a specific cookie
    pub fn remove(&self, name: &str, domain: &str, path: &str) {
        if let Some(mut cookies) = self.cookies.get_mut(domain) {
            cookies.retain(|c| c.name != name || c.path != path);
        }
    }

    pub fn clear(&self) {
        self.cookies.clear();
    }

    fn remove_expired(&self) {
        self.cookies.retain(|_, cookies| {
            cookies.retain(|c| !c.is_expired());
            !cookies.is_empty()
        });
    }

    /// Total cookie count
    pub fn len(&self) -> usize {
        self.cookies.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export all cookies as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        let all: Vec<Cookie> = self
            .cookies
            .iter()
            .flat_map(|e| e.value().clone())
            .collect();
        serde_json::to_string(&all)
    }

    /// Import cookies from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let cookies: Vec<Cookie> = serde_json::from_str(json)?;
        let jar = CookieJar::new();
        for cookie in cookies {
            jar.add(cookie);
        }
        Ok(jar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use reqwest::header::HeaderValue;
    use reqwest::StatusCode;

    #[test]
    fn test_cookie_parsing() {
        let url = Url::parse("https://example.com/path").unwrap();
        let header = "session=abc123; Domain=example.com; Path=/; Secure; HttpOnly";
        let cookie = Cookie::parse(header, &url).unwrap();

        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, "example.com");
        assert_eq!(cookie.path, "/");
        assert!(cookie.secure);
        assert!(cookie.http_only);
        assert!(!cookie.host_only);
    }

    #[test]
    fn test_default_path_and_host_only() {
        let url = Url::parse("http://shop.example.com/cart/items").unwrap();
        let cookie = Cookie::parse("id=7", &url).unwrap();
        assert_eq!(cookie.path, "/cart");
        assert!(cookie.host_only);

        assert!(cookie.matches(&Url::parse("http://shop.example.com/cart/view").unwrap()));
        assert!(!cookie.matches(&Url::parse("http://shop.example.com/cartoon").unwrap()));
        assert!(!cookie.matches(&Url::parse("http://www.shop.example.com/cart").unwrap()));
    }

    #[test]
    fn test_secure_cookie_not_sent_over_http() {
        let cookie = Cookie::new("s", "1").domain("example.com").secure(true);
        assert!(cookie.matches(&Url::parse("https://example.com/").unwrap()));
        assert!(!cookie.matches(&Url::parse("http://example.com/").unwrap()));
    }

    #[test]
    fn test_cookie_jar() {
        let jar = CookieJar::new();
        let url = Url::parse("https://example.com/path").unwrap();

        jar.add(Cookie::new("test", "value").domain("example.com"));
        jar.add(Cookie::new("test", "newer").domain("example.com"));
        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get_cookie_header(&url).as_deref(), Some("test=newer"));
    }

    #[test]
    fn test_expired_cookie_deletes() {
        let jar = CookieJar::new();
        let url = Url::parse("http://example.com/").unwrap();
        jar.add_from_header("a=1", &url);
        jar.add_from_header("a=gone; Max-Age=0", &url);
        assert!(jar.is_empty());
    }

    #[test]
    fn test_store_from_response() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2; Path=/"));
        headers.append("set-cookie", HeaderValue::from_static("garbage"));
        let url = Url::parse("http://example.com/").unwrap();
        let response = Response::new(StatusCode::OK, headers, Bytes::new(), url.clone());

        let jar = CookieJar::new();
        assert_eq!(jar.store_from_response(&response), 2);
        assert_eq!(jar.get_cookie_header(&url).as_deref(), Some("a=1; b=2"));
    }

    #[test]
    fn test_foreign_domain_rejected() {
        let jar = CookieJar::new();
        let attacker = Url::parse("http://attacker.test/").unwrap();
        jar.add_from_header("sid=evil; Domain=bank.example", &attacker);
        jar.add_from_header("tld=1; Domain=test", &attacker);
        assert!(jar.is_empty());
        assert_eq!(
            jar.get_cookie_header(&Url::parse("http://bank.example/").unwrap()),
            None
        );

        let ip = Url::parse("http://10.0.0.1/").unwrap();
        assert!(Cookie::parse("a=1; Domain=example.com", &ip).is_none());
        assert!(Cookie::parse("a=1; Domain=0.0.1", &ip).is_none());
        assert!(Cookie::parse("a=1; Domain=10.0.0.1", &ip).is_some());
    }

    #[test]
    fn test_parent_domain_accepted() {
        let jar = CookieJar::new();
        let shop = Url::parse("http://shop.example.com/").unwrap();
        jar.add_from_header("cart=3; Domain=.Example.com", &shop);
        jar.add_from_header("own=1; Domain=shop.example.com", &shop);
        assert!(Cookie::parse("x=1; Domain=other.example.com", &shop).is_none());

        let www = Url::parse("http://www.example.com/").unwrap();
        assert_eq!(jar.get_cookie_header(&www).as_deref(), Some("cart=3"));
        assert_eq!(jar.get_cookie_header(&shop).as_deref(), Some("cart=3; own=1"));
    }

    #[test]
    fn test_json_roundtrip() {
        let jar = CookieJar::new();
        jar.add(Cookie::new("k", "v").domain("example.com"));
        let restored = CookieJar::from_json(&jar.to_json().unwrap()).unwrap();
        assert_eq!(restored.len(), 1);
    }
}
