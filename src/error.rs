// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for loadprobe
//!
//! Two layers live here. [`HostError`] is what a host environment returns when
//! the document object model refuses or cannot answer a question; the probe
//! maps every one of those to a sentinel and never propagates them.
//! [`Error`] covers the outer surfaces that genuinely fail: fetching a page,
//! building an HTTP client, serializing a report, reading a stack-trace file.

use thiserror::Error;

/// Result type alias for loadprobe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a host environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Access blocked by a security boundary (cross-origin frame, etc.)
    #[error("access denied by security boundary: {0}")]
    SecurityDenied(String),

    /// The host does not provide this capability
    #[error("capability unavailable: {0}")]
    Unavailable(String),

    /// The capability exists but the call failed
    #[error("host call failed: {0}")]
    Failed(String),
}

impl HostError {
    /// Create a security denial
    pub fn denied<S: Into<String>>(what: S) -> Self {
        HostError::SecurityDenied(what.into())
    }

    /// Create an unavailable-capability error
    pub fn unavailable<S: Into<String>>(what: S) -> Self {
        HostError::Unavailable(what.into())
    }

    /// Create a generic failure
    pub fn failed<S: Into<String>>(what: S) -> Self {
        HostError::Failed(what.into())
    }

    /// Check if this is a security-boundary denial
    pub fn is_security_denial(&self) -> bool {
        matches!(self, HostError::SecurityDenied(_))
    }
}

/// Main error type for loadprobe
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Page could not be loaded as a host document
    #[error("Failed to load page {url}: {reason}")]
    PageLoad {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// No script element matched the requested pattern
    #[error("No script matching '{pattern}' in {url}")]
    ScriptNotFound { pattern: String, url: String },

    /// Host environment error surfaced outside the probe
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a page load error
    pub fn page_load(url: impl Into<String>, status: Option<u16>, reason: impl Into<String>) -> Self {
        Error::PageLoad {
            url: url.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Create a script-not-found error
    pub fn script_not_found(pattern: impl Into<String>, url: impl Into<String>) -> Self {
        Error::ScriptNotFound {
            pattern: pattern.into(),
            url: url.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::PageLoad { status, .. } => *status,
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::PageLoad { url, .. } => Some(url),
            Error::ScriptNotFound { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Attach a URL to a page load failure
    fn with_url(self, url: &str) -> Result<T>;

    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn with_url(self, url: &str) -> Result<T> {
        self.map_err(|e| {
            let err: Error = e.into();
            match err {
                Error::PageLoad { status, reason, .. } => Error::PageLoad {
                    url: url.to_string(),
                    status,
                    reason,
                },
                Error::Http(e) => Error::PageLoad {
                    url: url.to_string(),
                    status: e.status().map(|s| s.as_u16()),
                    reason: e.to_string(),
                },
                other => other,
            }
        })
    }

    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err: Error = e.into();
            Error::Other(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_denial() {
        let err = HostError::denied("window.top");
        assert!(err.is_security_denial());
        assert!(!HostError::unavailable("sendBeacon").is_security_denial());
        assert_eq!(
            err.to_string(),
            "access denied by security boundary: window.top"
        );
    }

    #[test]
    fn test_page_load_error() {
        let err = Error::page_load("https://example.com", Some(404), "Not Found");
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.url(), Some("https://example.com"));
        assert!(!err.is_network());
    }

    #[test]
    fn test_with_url_rewrites_page_load() {
        let res: std::result::Result<(), Error> = Err(Error::page_load("", None, "not html"));
        let err = res.with_url("https://example.com/page").unwrap_err();
        assert_eq!(err.url(), Some("https://example.com/page"));
    }

    #[test]
    fn test_context() {
        let res: std::result::Result<(), HostError> = Err(HostError::failed("boom"));
        let err = res.context("reading stack").unwrap_err();
        assert_eq!(err.to_string(), "reading stack: Host error: host call failed: boom");
    }
}
