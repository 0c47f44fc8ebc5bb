//! Minimal HTTP/1.1 layer that opens a streaming response.
//!
//! This module only gets a stream to the point where the decoder can take
//! over: build the request, connect, send it, parse the response head and
//! surface non-2xx answers as [`HttpError`]. The chunked body is never read
//! here; the raw socket is handed to [`JsonStream`](crate::JsonStream).
//!
//! Plain `http` only. Callers that need TLS open their own connection and
//! pass it in through [`RawSocket`](crate::RawSocket).

mod connect;
mod constants;
mod error;
mod request;
mod response;

use std::net::TcpStream;

pub use connect::open_stream;
pub use constants::CONNECT_TIMEOUT_SECS;
pub use error::HttpError;
pub use request::{Method, StreamRequest};
pub use response::{ResponseHead, parse_response_head};

use crate::stream::{JsonStream, StreamConfig};

/// Opens a streaming request and wraps the response in a [`JsonStream`].
///
/// # Errors
///
/// Returns the errors of [`open_stream`], plus [`HttpError::Stream`] when the
/// socket cannot be configured for the requested mode.
pub fn open(
    request: &StreamRequest,
    config: StreamConfig,
) -> Result<JsonStream<TcpStream>, HttpError> {
    let response = open_stream(request)?;
    Ok(JsonStream::new(response, request, config)?)
}
