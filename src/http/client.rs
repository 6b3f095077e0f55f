// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP transport

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::Client;

use super::request::Request;
use super::response::{Response, StreamingResponse};
use crate::error::{Error, Result};

/// Anything that can carry a request to a server and bring back the answer.
///
/// The browser only builds requests and consumes responses; connection
/// pooling, TLS and redirects belong to the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request, buffering the whole body
    async fn execute(&self, request: Request) -> Result<Response>;

    /// Perform the request and hand the body over as it arrives.
    ///
    /// The default buffers through `execute` and replays the body as one chunk.
    async fn execute_stream(&self, request: Request) -> Result<StreamingResponse> {
        Ok(self.execute(request).await?.into())
    }
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Default timeout
    pub timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Headers sent with every request
    pub default_headers: HeaderMap,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            "accept",
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            "accept-language",
            HeaderValue::from_static("en-US,en;q=0.5"),
        );

        Self {
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            accept_invalid_certs: false,
            default_headers,
            proxy: None,
        }
    }
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpClient {
    /// Client following redirects
    client: Client,
    /// Client returning 3xx responses as-is
    no_redirect: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Self::build(&config, Policy::limited(config.max_redirects))?;
        let no_redirect = Self::build(&config, Policy::none())?;

        Ok(Self {
            client,
            no_redirect,
            config,
        })
    }

    fn build(config: &HttpClientConfig, policy: Policy) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .redirect(policy)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .default_headers(config.default_headers.clone());

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        Ok(builder.build()?)
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

impl HttpClient {
    /// Send the request and return once status and headers are in
    async fn send(&self, request: Request) -> Result<reqwest::Response> {
        let client = if request.follow_redirects {
            &self.client
        } else {
            &self.no_redirect
        };

        let mut builder = client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(builder.send().await?)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, request: Request) -> Result<Response> {
        let start = Instant::now();
        let method = request.method.clone();

        let response = self.send(request).await?;

        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        let response =
            Response::new(status, headers, body, final_url).with_elapsed(start.elapsed());
        tracing::debug!(
            method = %method,
            url = %response.url,
            status = response.status_code(),
            bytes = response.body_len(),
            mime = ?response.mime_type(),
            elapsed_ms = response.elapsed.as_millis() as u64,
            "Response received"
        );
        Ok(response)
    }

    async fn execute_stream(&self, request: Request) -> Result<StreamingResponse> {
        let method = request.method.clone();
        let response = self.send(request).await?;

        tracing::debug!(
            method = %method,
            url = %response.url(),
            status = response.status().as_u16(),
            "Streaming response"
        );

        Ok(StreamingResponse {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
            body: response
                .bytes_stream()
                .map(|chunk| chunk.map_err(Error::from))
                .boxed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.config().max_redirects, 10);
        assert_eq!(client.config().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_proxy() {
        let config = HttpClientConfig {
            proxy: Some("http://bad proxy host".into()),
            ..Default::default()
        };
        assert!(matches!(
            HttpClient::with_config(config),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let client = HttpClient::new().unwrap();
        let err = client
            .execute(Request::get("http://127.0.0.1:1/").unwrap())
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
