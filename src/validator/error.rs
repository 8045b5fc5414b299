//! Error types for the validator.
//!
//! [`TransportError`] never escapes [`Validator::validate`](super::Validator::validate);
//! it is logged and folded into [`Outcome::Unreachable`](super::Outcome::Unreachable).

use thiserror::Error;

/// Failure to obtain an account page for a cookie set.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that was requested.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success HTTP status.
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The cookie set cannot be encoded as a `Cookie` header value.
    #[error("cookie set cannot be sent as a request header")]
    InvalidCookieHeader,
}

impl TransportError {
    /// Classifies a reqwest error as timeout or generic network failure.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }
}

/// Errors constructing a [`Validator`](super::Validator).
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The account URL is malformed or not http(s).
    #[error("invalid account URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A zero timeout was supplied.
    #[error("invalid timeout: must be greater than zero")]
    InvalidTimeout,

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
