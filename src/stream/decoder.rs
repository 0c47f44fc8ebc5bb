//! Incremental JSON decoder over a chunked HTTP response body.
//!
//! [`JsonStream`] is a pull-based iterator. Each call to `next` first drains
//! complete values already buffered, and only touches the socket when the
//! buffer holds nothing complete. The same drain/fill loop serves all three
//! [`StreamMode`]s; the mode only decides how the fill phase waits.

use std::iter::FusedIterator;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, trace, warn};

use super::buffer::DecodeBuffer;
use super::chunk::ChunkReader;
use super::config::{StreamConfig, StreamMode};
use super::error::{ChunkError, StreamError};
use super::event::{StreamEvent, StreamMessage};
use super::response::{ResponseHeaders, StreamResponse};
use super::socket::RawSocket;
use crate::http::StreamRequest;

/// Lazy sequence of [`StreamEvent`]s decoded from one streaming response.
///
/// The stream owns the socket; dropping it closes the connection. After a
/// [`StreamEvent::Hangup`] or an error the iterator yields `None`.
///
/// # Example
///
/// ```no_run
/// use jsonstream_core::{StreamConfig, StreamEvent, StreamRequest, open};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let request = StreamRequest::get("http://localhost:8080/1.1/statuses/sample.json");
/// for event in open(&request, StreamConfig::blocking())? {
///     match event? {
///         StreamEvent::Message(message) => println!("{}", *message),
///         StreamEvent::Hangup => break,
///         _ => {}
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct JsonStream<S: RawSocket> {
    socket: S,
    reader: ChunkReader,
    buffer: DecodeBuffer,
    headers: Arc<ResponseHeaders>,
    uri: String,
    mode: StreamMode,
    phase: Phase,
    last_read: Instant,
    finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Drain,
    Fill,
    /// The body ended after a final message; only the hangup is left.
    Closing,
}

/// Outcome of one fill attempt.
enum Fill {
    Appended,
    Idle,
    Timeout,
    /// End of body, with a trailing number that was still held back.
    Hangup(Option<Value>),
}

impl<S: RawSocket> JsonStream<S> {
    /// Wraps an open response, enabling keep-alive and setting the socket's
    /// blocking mode for the configured [`StreamMode`].
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Socket`] when a socket option cannot be applied.
    pub fn new(
        response: StreamResponse<S>,
        request: &StreamRequest,
        config: StreamConfig,
    ) -> Result<Self, StreamError> {
        let uri = request.uri();
        let mode = config.mode();
        let StreamResponse {
            headers,
            socket,
            body_prefix,
        } = response;

        socket
            .set_keepalive(true)
            .map_err(|e| StreamError::socket(&uri, e))?;
        socket
            .set_nonblocking(!mode.uses_blocking_socket())
            .map_err(|e| StreamError::socket(&uri, e))?;

        debug!(
            uri = %uri,
            ?mode,
            status = headers.status(),
            prefix_bytes = body_prefix.len(),
            "json stream opened"
        );

        Ok(Self {
            socket,
            reader: ChunkReader::with_buffered(body_prefix),
            buffer: DecodeBuffer::new(),
            headers: Arc::new(headers),
            uri,
            mode,
            phase: Phase::Drain,
            last_read: Instant::now(),
            finished: false,
        })
    }

    /// Headers of the response, shared by every message.
    #[must_use]
    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    #[must_use]
    pub fn mode(&self) -> StreamMode {
        self.mode
    }

    /// URI of the request that opened the stream.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Bytes received but not yet emitted (decode buffer plus raw framing).
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() + self.reader.buffered_len()
    }

    fn next_event(&mut self) -> Result<StreamEvent, StreamError> {
        loop {
            match self.phase {
                Phase::Drain => {
                    let parsed = self
                        .buffer
                        .next_value()
                        .map_err(|e| StreamError::json(&self.uri, e))?;
                    if let Some(value) = parsed {
                        trace!(remaining = self.buffer.len(), "json value decoded");
                        return Ok(self.message(value));
                    }
                    self.phase = Phase::Fill;
                    if self.mode == StreamMode::NonBlocking {
                        return Ok(StreamEvent::NoData);
                    }
                }
                Phase::Fill => {
                    self.phase = Phase::Drain;
                    match self.fill()? {
                        Fill::Appended | Fill::Idle => {}
                        Fill::Timeout => return Ok(StreamEvent::Timeout),
                        Fill::Hangup(None) => return Ok(StreamEvent::Hangup),
                        Fill::Hangup(Some(last)) => {
                            self.phase = Phase::Closing;
                            return Ok(self.message(last));
                        }
                    }
                }
                Phase::Closing => return Ok(StreamEvent::Hangup),
            }
        }
    }

    fn message(&self, value: Value) -> StreamEvent {
        StreamEvent::Message(StreamMessage::new(value, Arc::clone(&self.headers)))
    }

    fn fill(&mut self) -> Result<Fill, StreamError> {
        self.buffer.strip_leading_whitespace();

        if let StreamMode::IdleTimeout(timeout) = self.mode
            && !self.reader.has_buffered_frame()
        {
            let ready = self
                .socket
                .wait_readable(timeout)
                .map_err(|e| StreamError::socket(&self.uri, e))?;
            if !ready {
                if self.buffer.is_empty() && self.last_read.elapsed() >= timeout {
                    debug!(uri = %self.uri, ?timeout, "stream idle past timeout");
                    return Ok(Fill::Timeout);
                }
                return Ok(Fill::Idle);
            }
        }

        self.last_read = Instant::now();
        let payload = match self.reader.read_chunk(&mut self.socket) {
            Ok(payload) => payload,
            Err(ChunkError::WouldBlock) if self.mode.tolerates_would_block() => {
                return Ok(Fill::Idle);
            }
            Err(e) => {
                warn!(uri = %self.uri, error = %e, "stream read failed");
                return Err(StreamError::chunk(&self.uri, e));
            }
        };

        if self.reader.is_finished() || self.reader.is_closed() {
            let last = self.buffer.take_trailing_number();
            debug!(
                uri = %self.uri,
                finished = self.reader.is_finished(),
                flushed = last.is_some(),
                discarded = self.buffer.len(),
                "stream hung up"
            );
            return Ok(Fill::Hangup(last));
        }
        self.buffer.append(&payload);
        trace!(
            bytes = payload.len(),
            buffered = self.buffer.len(),
            "chunk appended"
        );
        Ok(Fill::Appended)
    }
}

impl<S: RawSocket> Iterator for JsonStream<S> {
    type Item = Result<StreamEvent, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let event = self.next_event();
        if matches!(event, Ok(StreamEvent::Hangup) | Err(_)) {
            self.finished = true;
        }
        Some(event)
    }
}

impl<S: RawSocket> FusedIterator for JsonStream<S> {}
