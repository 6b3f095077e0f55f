// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for Skiff
//!
//! Every operation returns its failure to the caller. Nothing is retried
//! internally, so callers can tell a selector miss from a dead network and
//! decide for themselves what to do.

use thiserror::Error;

/// Result type alias for Skiff operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Skiff
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport failed (network, DNS, TLS)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Transport failure reported by a non-reqwest transport
    #[error("Transport error for {url}: {reason}")]
    TransportFailed { url: String, reason: String },

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Response body could not be turned into a document
    #[error("Parse error: {0}")]
    Parse(String),

    /// Selector, form field, submit control or bookmark lookup missed
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// Bookmark name already taken
    #[error("Bookmark '{0}' already exists")]
    DuplicateName(String),

    /// Operation needs a state the session is not in
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Selector parsing error
    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a not-found error
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Create a transport error for a custom transport
    pub fn transport(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::TransportFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }

    /// Create an illegal-state error
    pub fn illegal_state<S: Into<String>>(msg: S) -> Self {
        Error::IllegalState(msg.into())
    }

    /// Create a selector error
    pub fn selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Selector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::TransportFailed { .. })
    }

    /// Check if this is a lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check if this is a duplicate bookmark name
    pub fn is_duplicate_name(&self) -> bool {
        matches!(self, Error::DuplicateName(_))
    }

    /// Check if this is an illegal-state error
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Error::IllegalState(_))
    }

    /// Check if this is a timeout reported by the transport
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Transport(e) => e.url().map(|u| u.as_str()),
            Error::TransportFailed { url, .. } => Some(url),
            _ => None,
        }
    }
}
