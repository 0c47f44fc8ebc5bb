//! Chunked JSON stream decoding.
//!
//! The pieces, bottom-up:
//! - [`RawSocket`] - the byte stream handed over by whatever opened the connection
//! - [`ChunkReader`] - recovers chunk payloads from the raw chunked body
//! - [`DecodeBuffer`] - accumulates payload bytes and yields complete JSON values
//! - [`JsonStream`] - the iterator tying them together under a [`StreamMode`]

mod buffer;
mod chunk;
mod config;
mod constants;
mod decoder;
mod error;
mod event;
mod response;
mod socket;

pub use buffer::DecodeBuffer;
pub use chunk::ChunkReader;
pub use config::{StreamConfig, StreamMode};
pub use constants::{MAX_SIZE_LINE_LEN, PROBE_LEN};
pub use decoder::JsonStream;
pub use error::{ChunkError, StreamError};
pub use event::{StreamEvent, StreamMessage};
pub use response::{ResponseHeaders, StreamResponse};
pub use socket::RawSocket;
