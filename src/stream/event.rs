//! Events produced by a JSON stream.

use std::ops::Deref;
use std::sync::Arc;

use serde_json::{Value, json};

use super::response::ResponseHeaders;

/// One element of a JSON stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A decoded JSON value.
    Message(StreamMessage),
    /// Idle-timeout mode only: no data within the timeout. The stream stays usable.
    Timeout,
    /// The peer closed the stream. Always the last event.
    Hangup,
    /// Non-blocking mode only: nothing ready yet, poll again later.
    NoData,
}

impl StreamEvent {
    /// Returns the decoded message, if this event carries one.
    #[must_use]
    pub fn message(&self) -> Option<&StreamMessage> {
        match self {
            Self::Message(message) => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Hangup)
    }

    /// Wire-level rendering: the value itself, `{"timeout": true}`,
    /// `{"hangup": true}`, or `null` for no data.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Message(message) => message.value.clone(),
            Self::Timeout => json!({ "timeout": true }),
            Self::Hangup => json!({ "hangup": true }),
            Self::NoData => Value::Null,
        }
    }
}

/// A decoded JSON value together with the headers of the response it came from.
///
/// The headers are captured once per connection and shared by every message.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamMessage {
    value: Value,
    headers: Arc<ResponseHeaders>,
}

impl StreamMessage {
    #[must_use]
    pub fn new(value: Value, headers: Arc<ResponseHeaders>) -> Self {
        Self { value, headers }
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }
}

impl Deref for StreamMessage {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.value
    }
}
