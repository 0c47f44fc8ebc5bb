//! The opened-response boundary handed to the decoder.

use serde_json::{Map, Value};

use super::socket::RawSocket;

/// Status code and header block of a streaming response.
///
/// Header order is preserved; lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    status: u16,
    entries: Vec<(String, String)>,
}

impl ResponseHeaders {
    #[must_use]
    pub fn new(status: u16, entries: Vec<(String, String)>) -> Self {
        Self { status, entries }
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// First value of the named header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Every value of the named header, in arrival order.
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true when `Transfer-Encoding` lists `chunked`.
    #[must_use]
    pub fn is_chunked(&self) -> bool {
        self.get_all("transfer-encoding").any(|value| {
            value
                .split(',')
                .any(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
        })
    }

    /// Renders the headers as a JSON object keyed by lowercase name;
    /// repeated headers are joined with `", "`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.entries {
            let key = key.to_ascii_lowercase();
            match map.get_mut(&key) {
                Some(Value::String(existing)) => {
                    existing.push_str(", ");
                    existing.push_str(value);
                }
                _ => {
                    map.insert(key, Value::String(value.clone()));
                }
            }
        }
        Value::Object(map)
    }
}

/// An open streaming response: parsed headers plus the raw socket.
///
/// `body_prefix` carries body bytes that were read off the socket together
/// with the response head; the chunk reader consumes them first.
#[derive(Debug)]
pub struct StreamResponse<S: RawSocket> {
    pub headers: ResponseHeaders,
    pub socket: S,
    pub body_prefix: Vec<u8>,
}

impl<S: RawSocket> StreamResponse<S> {
    #[must_use]
    pub fn new(headers: ResponseHeaders, socket: S) -> Self {
        Self {
            headers,
            socket,
            body_prefix: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_body_prefix(mut self, prefix: Vec<u8>) -> Self {
        self.body_prefix = prefix;
        self
    }
}
