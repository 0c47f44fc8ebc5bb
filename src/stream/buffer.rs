//! Decode buffer holding stream payload that has not been parsed yet.
//!
//! Payload bytes are appended at the tail as chunks arrive; complete JSON
//! values are cut from the head. Between iterations the buffer holds zero
//! or more complete values followed by at most one incomplete fragment.
//! Raw bytes are kept rather than text so a UTF-8 sequence split across
//! two chunks decodes once both halves are present.

use serde_json::{Deserializer, Value};

/// Append-at-tail, truncate-at-head buffer of undecoded JSON text.
#[derive(Debug, Default)]
pub struct DecodeBuffer {
    bytes: Vec<u8>,
}

impl DecodeBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk payload.
    pub fn append(&mut self, payload: &[u8]) {
        self.bytes.extend_from_slice(payload);
    }

    /// Drops leading JSON whitespace, which is where keep-alive newlines end up.
    pub fn strip_leading_whitespace(&mut self) {
        let start = self
            .bytes
            .iter()
            .position(|b| !is_json_whitespace(*b))
            .unwrap_or(self.bytes.len());
        if start > 0 {
            self.bytes.drain(..start);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Cuts one complete JSON value off the head of the buffer.
    ///
    /// Returns `Ok(None)` when the buffer is empty or holds only the start of
    /// a value. A number that runs up to the end of the buffer also counts as
    /// incomplete, since more digits may still be in flight.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the head of the buffer can never become
    /// valid JSON, whatever bytes arrive next.
    pub fn next_value(&mut self) -> Result<Option<Value>, serde_json::Error> {
        self.strip_leading_whitespace();
        if self.bytes.is_empty() {
            return Ok(None);
        }

        let (parsed, consumed) = {
            let mut values = Deserializer::from_slice(&self.bytes).into_iter::<Value>();
            let parsed = values.next();
            (parsed, values.byte_offset())
        };

        match parsed {
            None => Ok(None),
            Some(Err(e)) if e.is_eof() => Ok(None),
            Some(Err(e)) => Err(e),
            Some(Ok(value)) if value.is_number() && consumed == self.bytes.len() => Ok(None),
            Some(Ok(value)) => {
                self.bytes.drain(..consumed);
                Ok(Some(value))
            }
        }
    }

    /// Takes the number held back by [`next_value`](Self::next_value) once
    /// no more bytes can arrive.
    ///
    /// Returns `None` and leaves the buffer untouched when it holds anything
    /// other than exactly one complete number.
    pub fn take_trailing_number(&mut self) -> Option<Value> {
        self.strip_leading_whitespace();
        let mut values = Deserializer::from_slice(&self.bytes).into_iter::<Value>();
        match values.next() {
            Some(Ok(value)) if value.is_number() && values.byte_offset() == self.bytes.len() => {
                self.bytes.clear();
                Some(value)
            }
            _ => None,
        }
    }
}

fn is_json_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}
