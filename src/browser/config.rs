// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser configuration

use std::time::Duration;

use crate::agent::UserAgent;
use crate::http::HttpClientConfig;

/// Session behaviour toggled at runtime with `Browser::set_attribute`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Send the current page URL as Referer on navigation
    SendReferer,
    /// Follow 3xx responses instead of returning them as the new state
    FollowRedirects,
}

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// User agent string
    pub user_agent: String,
    /// Per-request timeout handed to the transport
    pub timeout: Duration,
    /// Follow redirects
    pub follow_redirects: bool,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Send Referer on navigation
    pub send_referer: bool,
    /// Accept invalid TLS certificates
    pub ignore_https_errors: bool,
    /// Proxy URL
    pub proxy: Option<String>,
    /// Headers added to the session before the first request
    pub default_headers: Vec<(String, String)>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: UserAgent::default().create(),
            timeout: Duration::from_secs(30),
            follow_redirects: true,
            max_redirects: 10,
            send_referer: true,
            ignore_https_errors: false,
            proxy: None,
            default_headers: vec![],
        }
    }
}

impl BrowserConfig {
    /// Create a new browser config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent string
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Render the user agent from a template
    pub fn agent(mut self, agent: &UserAgent) -> Self {
        self.user_agent = agent.create();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    pub fn send_referer(mut self, send: bool) -> Self {
        self.send_referer = send;
        self
    }

    /// Ignore HTTPS errors
    pub fn ignore_https_errors(mut self, ignore: bool) -> Self {
        self.ignore_https_errors = ignore;
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Add default header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Transport settings derived from this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: self.timeout,
            max_redirects: self.max_redirects,
            accept_invalid_certs: self.ignore_https_errors,
            proxy: self.proxy.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = BrowserConfig::new()
            .timeout(Duration::from_secs(5))
            .follow_redirects(false)
            .header("x-api-key", "k")
            .agent(&UserAgent::new("lynx", "", "", ""));

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.follow_redirects);
        assert_eq!(config.default_headers.len(), 1);
        assert!(config.user_agent.starts_with("Lynx/"));
    }

    #[test]
    fn test_http_client_config() {
        let config = BrowserConfig::new()
            .ignore_https_errors(true)
            .max_redirects(3)
            .proxy("http://127.0.0.1:8080");
        let http = config.http_client_config();
        assert!(http.accept_invalid_certs);
        assert_eq!(http.max_redirects, 3);
        assert_eq!(http.proxy.as_deref(), Some("http://127.0.0.1:8080"));
    }
}
