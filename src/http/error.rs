//! Error types for opening a streaming connection.
//!
//! Everything that can go wrong before the first chunk is read ends up
//! here, including non-2xx responses, so a [`JsonStream`](crate::JsonStream)
//! is only ever built on a successful handshake.

use std::io;

use thiserror::Error;

use crate::stream::StreamError;

/// Errors raised while connecting, sending the request or reading the response head.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The URL could not be parsed or has no host.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// Only plain `http` URLs can be opened by this client.
    #[error("unsupported URL scheme '{scheme}' in {url}: only http is supported")]
    UnsupportedScheme {
        /// The request URL.
        url: String,
        /// The rejected scheme.
        scheme: String,
    },

    /// A request header contains characters that would break the request framing.
    #[error("invalid request header {name:?} for {url}")]
    InvalidHeader {
        /// The request URL.
        url: String,
        /// The header name.
        name: String,
    },

    /// TCP connection could not be established.
    #[error("failed to connect to {url}: {source}")]
    Connect {
        /// The request URL.
        url: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Sending the request or reading the response head failed.
    #[error("IO error talking to {url}: {source}")]
    Io {
        /// The request URL.
        url: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The response head is not valid HTTP/1.x.
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse {
        /// The request URL.
        url: String,
        /// What was wrong with the response.
        reason: String,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} {reason} opening stream {url}")]
    Status {
        /// The request URL.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The reason phrase from the status line.
        reason: String,
    },

    /// The server answered 2xx without chunked transfer encoding.
    #[error("response from {url} is not chunked (Transfer-Encoding: {transfer_encoding:?})")]
    NotChunked {
        /// The request URL.
        url: String,
        /// The Transfer-Encoding header value, empty when absent.
        transfer_encoding: String,
    },

    /// The socket could not be configured for streaming.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl HttpError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a connect error.
    pub fn connect(url: impl Into<String>, source: io::Error) -> Self {
        Self::Connect {
            url: url.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(url: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            url: url.into(),
            source,
        }
    }

    /// Creates a malformed response error.
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an HTTP status error.
    pub fn status(url: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        Self::Status {
            url: url.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status code for [`HttpError::Status`].
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
