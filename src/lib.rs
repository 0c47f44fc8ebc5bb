//! jsonstream core library
//!
//! Consumes long-lived HTTP responses that deliver JSON documents inside
//! chunked transfer encoding, one event at a time.
//!
//! # Architecture
//!
//! - [`http`] - opens the connection and checks the response head
//! - [`stream`] - chunk framing, JSON accumulation and the event iterator
//!
//! ```no_run
//! use jsonstream_core::{StreamConfig, StreamEvent, StreamRequest, open};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = StreamRequest::get("http://localhost:8080/1.1/statuses/sample.json");
//! for event in open(&request, StreamConfig::blocking())? {
//!     match event? {
//!         StreamEvent::Message(message) => println!("{}", message.value()),
//!         StreamEvent::Hangup => break,
//!         StreamEvent::Timeout | StreamEvent::NoData => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod http;
pub mod stream;
#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod user_agent;

pub use http::{HttpError, Method, StreamRequest, open, open_stream};
pub use stream::{
    ChunkError, ChunkReader, DecodeBuffer, JsonStream, RawSocket, ResponseHeaders, StreamConfig,
    StreamError, StreamEvent, StreamMessage, StreamMode, StreamResponse,
};
