// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browsing session

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use tokio::io::AsyncWrite;
use url::Url;

use super::assets::{self, Image, Link, Script, Stylesheet};
use super::config::{Attribute, BrowserConfig};
use super::download::{write_body, Downloader};
use super::form::{submit_button, Form, FormFields, SubmitButton, FORM_URLENCODED};
use super::state::State;
use crate::dom::{Document, Element};
use crate::error::{Error, Result};
use crate::http::{header_pair, headers, CookieJar, HttpClient, Request, Response, Transport};
use crate::jar::{BookmarksJar, History};

/// A stateful browsing session.
///
/// Every navigation that succeeds pushes a new [`State`] onto the history;
/// a navigation that fails leaves the session exactly as it was. Navigation
/// takes `&mut self`, so one session runs one request at a time.
pub struct Browser {
    config: BrowserConfig,
    transport: Arc<dyn Transport>,
    history: History,
    /// Headers sent with every request
    headers: HeaderMap,
    user_agent: String,
    cookie_jar: CookieJar,
    bookmarks: Option<Arc<dyn BookmarksJar>>,
    send_referer: bool,
    follow_redirects: bool,
}

impl Browser {
    /// Create a browser backed by the reqwest transport
    pub fn new(config: BrowserConfig) -> Result<Self> {
        let client = HttpClient::with_config(config.http_client_config())?;
        Self::with_transport(config, Arc::new(client))
    }

    /// Create browser with default config
    pub fn launch() -> Result<Self> {
        Self::new(BrowserConfig::default())
    }

    /// Create a browser on top of any transport
    pub fn with_transport(config: BrowserConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let (name, value) = header_pair(name, value)?;
            headers.append(name, value);
        }

        Ok(Self {
            user_agent: config.user_agent.clone(),
            send_referer: config.send_referer,
            follow_redirects: config.follow_redirects,
            config,
            transport,
            history: History::new(),
            headers,
            cookie_jar: CookieJar::new(),
            bookmarks: None,
        })
    }

    /// Get browser config
    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    // Navigation

    /// GET `url`, resolved against the current page when relative
    pub async fn open(&mut self, url: &str) -> Result<()> {
        let url = self.target(url)?;
        self.open_url(url).await
    }

    /// GET an absolute URL
    pub async fn open_url(&mut self, url: Url) -> Result<()> {
        self.navigate(Method::GET, url, None, None).await
    }

    /// POST `body` to `url` with the given content type
    pub async fn post(
        &mut self,
        url: &str,
        content_type: &str,
        body: impl Into<Bytes>,
    ) -> Result<()> {
        let url = self.target(url)?;
        self.navigate(Method::POST, url, Some(content_type), Some(body.into()))
            .await
    }

    /// HEAD `url`; the new state carries headers and status but no document
    pub async fn head(&mut self, url: &str) -> Result<()> {
        let url = self.target(url)?;
        self.navigate(Method::HEAD, url, None, None).await
    }

    /// Re-request the current page, replacing it in the history
    pub async fn reload(&mut self) -> Result<()> {
        let current = self.state()?;
        let method = if current.method == Method::HEAD {
            Method::HEAD
        } else {
            Method::GET
        };
        let url = current.url.clone();

        let state = self.fetch(method, url, None, None).await?;
        self.history.pop();
        self.history.push(state);
        Ok(())
    }

    /// Return to the previous page without a request.
    ///
    /// Returns false, changing nothing, when there is no previous page.
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }

    /// Click the first element matching `selector`.
    ///
    /// A link opens its href. A submit control submits its form with the
    /// control's name/value pair.
    pub async fn click(&mut self, selector: &str) -> Result<()> {
        let element = self
            .document()?
            .query_selector(selector)?
            .ok_or_else(|| Error::not_found("Element", selector))?;

        if let Some(button) = submit_button(&element) {
            let form = element
                .closest("form")?
                .ok_or_else(|| Error::not_found("Form", selector))?;
            let fields = FormFields::from_element(&form)?;
            let clicked = (!button.name.is_empty()).then_some(button);
            return self.submit_form(&fields, clicked.as_ref()).await;
        }

        match element.href() {
            Some(href) if matches!(element.local_name(), "a" | "area") => {
                let url = self.resolve_url(&href)?;
                self.open_url(url).await
            }
            _ => Err(Error::not_found("Clickable element", selector)),
        }
    }

    /// Submit a filled-in form from the current page
    pub(crate) async fn submit_form(
        &mut self,
        fields: &FormFields,
        clicked: Option<&SubmitButton>,
    ) -> Result<()> {
        let state = self.state()?;
        let submission = fields.submission(&state.base_url(), &state.url, clicked)?;

        tracing::debug!(
            method = %submission.method,
            url = %submission.url,
            button = clicked.map(|b| b.name.as_str()).unwrap_or(""),
            "Submitting form"
        );

        match submission.body {
            Some(body) => {
                self.navigate(
                    submission.method,
                    submission.url,
                    Some(FORM_URLENCODED),
                    Some(Bytes::from(body)),
                )
                .await
            }
            None => self.navigate(submission.method, submission.url, None, None).await,
        }
    }

    async fn navigate(
        &mut self,
        method: Method,
        url: Url,
        content_type: Option<&str>,
        body: Option<Bytes>,
    ) -> Result<()> {
        let state = self.fetch(method, url, content_type, body).await?;
        tracing::info!(
            method = %state.method,
            url = %state.url,
            status = state.status.as_u16(),
            depth = self.history.len() + 1,
            "Navigated"
        );
        self.history.push(state);
        Ok(())
    }

    /// Perform a request and build the resulting state without touching history.
    ///
    /// Redirects are followed here rather than in the transport so every hop
    /// sends the jar's cookies and stores the cookies it receives.
    async fn fetch(
        &self,
        mut method: Method,
        mut url: Url,
        mut content_type: Option<&str>,
        mut body: Option<Bytes>,
    ) -> Result<State> {
        let mut hops = 0;

        let response = loop {
            let request =
                self.build_request(method.clone(), url.clone(), content_type, body.clone())?;
            tracing::debug!(method = %request.method, url = %request.url, "Sending request");

            let response = self.transport.execute(request).await?;
            let Some(next) = self.redirect_target(&response) else {
                break response;
            };

            if hops >= self.config.max_redirects {
                return Err(Error::transport(
                    response.url.as_str(),
                    format!("more than {} redirects", self.config.max_redirects),
                ));
            }
            hops += 1;

            self.cookie_jar.store_from_headers(&response.headers, &response.url);
            tracing::debug!(
                status = response.status_code(),
                from = %response.url,
                to = %next,
                "Following redirect"
            );

            let keeps_body = matches!(
                response.status,
                StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT
            );
            if !keeps_body && method != Method::HEAD {
                method = Method::GET;
                content_type = None;
                body = None;
            }
            url = next;
        };

        let state = if method == Method::HEAD {
            State::without_document(method, response)
        } else {
            State::from_response(method, response)?
        };

        self.cookie_jar.store_from_headers(&state.headers, &state.url);
        Ok(state)
    }

    /// Where a 3xx response points, when redirects are being followed
    fn redirect_target(&self, response: &Response) -> Option<Url> {
        if !self.follow_redirects {
            return None;
        }
        match response.status {
            StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT => {}
            _ => return None,
        }
        let location = response.header(reqwest::header::LOCATION.as_str())?;
        response.url.join(location.trim()).ok()
    }

    fn build_request(
        &self,
        method: Method,
        url: Url,
        content_type: Option<&str>,
        body: Option<Bytes>,
    ) -> Result<Request> {
        let mut request = Request::new(method, url)
            .timeout(self.config.timeout)
            .follow_redirects(false)
            .header(headers::USER_AGENT, &self.user_agent)?;

        if self.send_referer {
            if let Some(current) = self.history.top() {
                request = request.header(headers::REFERER, current.url.as_str())?;
            }
        }

        for name in self.headers.keys() {
            let values = self.headers.get_all(name);
            if headers::is_single_valued(name.as_str()) {
                if let Some(last) = values.iter().last() {
                    request.headers.insert(name.clone(), last.clone());
                }
            } else {
                request.headers.remove(name);
                for value in values {
                    request.headers.append(name.clone(), value.clone());
                }
            }
        }

        if let Some(cookies) = self.cookie_jar.get_cookie_header(&request.url) {
            request = request.header(headers::COOKIE, cookies)?;
        }

        if let Some(content_type) = content_type {
            request = request.header(headers::CONTENT_TYPE, content_type)?;
        }

        if let Some(body) = body {
            request = request.body(body);
        }

        Ok(request)
    }

    /// Parse a navigation target, relative to the current page if there is one
    fn target(&self, url: &str) -> Result<Url> {
        match self.history.top() {
            Some(state) => Ok(state.base_url().join(url)?),
            None => Ok(Url::parse(url)?),
        }
    }

    // Bookmarks

    /// Save the current URL under `name`
    pub fn bookmark(&self, name: &str) -> Result<()> {
        let url = self.url()?.to_string();
        self.bookmarks_required()?.save(name, &url)
    }

    /// Open the URL saved under `name`
    pub async fn open_bookmark(&mut self, name: &str) -> Result<()> {
        let url = self.bookmarks_required()?.read(name)?;
        let url = Url::parse(&url)?;
        self.open_url(url).await
    }

    fn bookmarks_required(&self) -> Result<&Arc<dyn BookmarksJar>> {
        self.bookmarks
            .as_ref()
            .ok_or_else(|| Error::illegal_state("no bookmarks jar set"))
    }

    pub fn set_bookmarks_jar(&mut self, jar: Arc<dyn BookmarksJar>) {
        self.bookmarks = Some(jar);
    }

    pub fn bookmarks_jar(&self) -> Option<&Arc<dyn BookmarksJar>> {
        self.bookmarks.as_ref()
    }

    // Forms

    /// The first `<form>` matching `selector` on the current page
    pub fn form(&mut self, selector: &str) -> Result<Form<'_>> {
        let element = self
            .document()?
            .query_selector_all(selector)?
            .into_iter()
            .find(|e| e.local_name() == "form")
            .ok_or_else(|| Error::not_found("Form", selector))?;
        Form::new(self, element)
    }

    /// Every form on the current page
    pub fn forms(&self) -> Result<Vec<FormFields>> {
        self.document()?
            .query_selector_all("form")?
            .iter()
            .map(FormFields::from_element)
            .collect()
    }

    // Session settings

    /// Add a value to a request header sent with every request
    pub fn add_request_header(&mut self, name: &str, value: &str) -> Result<()> {
        let (name, value) = header_pair(name, value)?;
        self.headers.append(name, value);
        Ok(())
    }

    /// Replace all values of a persistent request header
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
        let (name, value) = header_pair(name, value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Stop sending a persistent request header
    pub fn del_request_header(&mut self, name: &str) {
        self.headers.remove(name);
    }

    /// Persistent request headers
    pub fn request_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Send HTTP basic credentials with every request
    pub fn set_basic_auth(&mut self, username: &str, password: &str) -> Result<()> {
        let token = STANDARD.encode(format!("{}:{}", username, password));
        let value = HeaderValue::try_from(format!("Basic {}", token))
            .map_err(|e| Error::Config(format!("invalid credentials: {}", e)))?;
        self.headers.insert(reqwest::header::AUTHORIZATION, value);
        Ok(())
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = user_agent.into();
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn set_attribute(&mut self, attribute: Attribute, value: bool) {
        match attribute {
            Attribute::SendReferer => self.send_referer = value,
            Attribute::FollowRedirects => self.follow_redirects = value,
        }
    }

    pub fn attribute(&self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::SendReferer => self.send_referer,
            Attribute::FollowRedirects => self.follow_redirects,
        }
    }

    /// Per-request timeout handed to the transport
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
    }

    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    pub fn set_cookie_jar(&mut self, jar: CookieJar) {
        self.cookie_jar = jar;
    }

    // History

    /// Number of states in the history, including the current one
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Forget every visited page
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // Accessors

    /// The current state
    pub fn state(&self) -> Result<&State> {
        self.history
            .top()
            .ok_or_else(|| Error::illegal_state("no page has been loaded"))
    }

    pub fn url(&self) -> Result<&Url> {
        Ok(&self.state()?.url)
    }

    pub fn status_code(&self) -> Result<u16> {
        Ok(self.state()?.status.as_u16())
    }

    /// Response headers of the current page
    pub fn headers(&self) -> Result<&HeaderMap> {
        Ok(&self.state()?.headers)
    }

    /// Body of the current page, lossily decoded
    pub fn body(&self) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.state()?.body).into_owned())
    }

    pub fn body_bytes(&self) -> Result<&Bytes> {
        Ok(&self.state()?.body)
    }

    pub fn title(&self) -> Result<String> {
        Ok(self.state()?.document.title())
    }

    pub fn document(&self) -> Result<&Document> {
        Ok(&self.state()?.document)
    }

    /// Elements of the current page matching `selector`
    pub fn find(&self, selector: &str) -> Result<Vec<Element>> {
        self.document()?.query_selector_all(selector)
    }

    /// Resolve `href` against the current page's base URL
    pub fn resolve_url(&self, href: &str) -> Result<Url> {
        Ok(self.state()?.base_url().join(href.trim())?)
    }

    pub fn links(&self) -> Result<Vec<Link>> {
        let state = self.state()?;
        Ok(assets::links(&state.document, &state.base_url()))
    }

    pub fn images(&self) -> Result<Vec<Image>> {
        let state = self.state()?;
        Ok(assets::images(&state.document, &state.base_url()))
    }

    pub fn stylesheets(&self) -> Result<Vec<Stylesheet>> {
        let state = self.state()?;
        Ok(assets::stylesheets(&state.document, &state.base_url()))
    }

    pub fn scripts(&self) -> Result<Vec<Script>> {
        let state = self.state()?;
        Ok(assets::scripts(&state.document, &state.base_url()))
    }

    // Downloads

    /// A downloader sharing this session's transport, user agent and timeout
    pub fn downloader(&self) -> Downloader {
        Downloader::new(self.transport.clone(), self.user_agent.clone())
            .timeout(self.config.timeout)
    }

    /// Write the current page body into `sink`, returns bytes written
    pub async fn download<W>(&self, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut written = 0;
        write_body(&self.state()?.body, sink, &mut written).await?;
        Ok(written)
    }
}
