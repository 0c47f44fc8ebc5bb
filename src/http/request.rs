//! Streaming request descriptor and its HTTP/1.1 serialization.

use std::time::Duration;

use url::Url;

use super::constants::CONNECT_TIMEOUT_SECS;
use super::error::HttpError;
use crate::user_agent;

/// Request method for a streaming endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Describes a streaming request.
///
/// Parameters go into the query string for GET and into an
/// `application/x-www-form-urlencoded` body for POST.
///
/// # Example
///
/// ```
/// use jsonstream_core::StreamRequest;
///
/// let request = StreamRequest::get("http://localhost:8080/1.1/statuses/sample.json")
///     .param("delimited", "length")
///     .header("Authorization", "Bearer token");
/// assert_eq!(
///     request.uri(),
///     "http://localhost:8080/1.1/statuses/sample.json?delimited=length"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    method: Method,
    url: String,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    connect_timeout: Duration,
}

impl StreamRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            headers: Vec::new(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Adds a request parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Adds a request header. A `User-Agent` header replaces the default one.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the connect timeout, also used while waiting for the response head.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// The full request URI; for GET this includes the encoded parameters.
    #[must_use]
    pub fn uri(&self) -> String {
        if self.method == Method::Post || self.params.is_empty() {
            return self.url.clone();
        }
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{separator}{}", self.url, self.encoded_params())
    }

    /// Parameters as `name=value&...`, percent-encoded.
    #[must_use]
    pub fn encoded_params(&self) -> String {
        self.params
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parses and checks the target URL.
    pub(crate) fn target_url(&self) -> Result<Url, HttpError> {
        let uri = self.uri();
        let url = Url::parse(&uri).map_err(|_| HttpError::invalid_url(&uri))?;
        if url.scheme() != "http" {
            return Err(HttpError::UnsupportedScheme {
                url: uri,
                scheme: url.scheme().to_string(),
            });
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(HttpError::invalid_url(uri));
        }
        Ok(url)
    }

    /// Serializes the request head and body.
    pub(crate) fn to_wire(&self, url: &Url) -> Result<Vec<u8>, HttpError> {
        for (name, value) in &self.headers {
            if !is_valid_header(name, value) {
                return Err(HttpError::InvalidHeader {
                    url: self.uri(),
                    name: name.clone(),
                });
            }
        }

        let mut target = url.path().to_string();
        if let Some(query) = url.query() {
            target.push('?');
            target.push_str(query);
        }
        let host = url.host_str().unwrap_or_default();
        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let mut head = String::new();
        head.push_str(&format!("{} {target} HTTP/1.1\r\n", self.method.as_str()));
        head.push_str(&format!("Host: {host}\r\n"));
        if !self.has_header("user-agent") {
            head.push_str(&format!(
                "User-Agent: {}\r\n",
                user_agent::default_stream_user_agent()
            ));
        }
        if !self.has_header("accept") {
            head.push_str("Accept: application/json\r\n");
        }
        head.push_str("Connection: keep-alive\r\n");
        for (name, value) in &self.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }

        let body = match self.method {
            Method::Get => String::new(),
            Method::Post => self.encoded_params(),
        };
        if self.method == Method::Post {
            head.push_str("Content-Type: application/x-www-form-urlencoded\r\n");
            head.push_str(&format!("Content-Length: {}\r\n", body.len()));
        }
        head.push_str("\r\n");

        let mut wire = head.into_bytes();
        wire.extend_from_slice(body.as_bytes());
        Ok(wire)
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

fn is_valid_header(name: &str, value: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && b != b':')
        && !value.bytes().any(|b| b == b'\r' || b == b'\n')
}
