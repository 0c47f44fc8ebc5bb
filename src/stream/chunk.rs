//! Chunked-transfer-encoding frame reader.
//!
//! Frames look like `<hex size>[;ext]\r\n<payload>\r\n`. The reader first
//! issues a small probe read that normally captures the whole size line
//! plus the start of the payload, then reads exactly the bytes still
//! missing for the frame. Bytes that arrive beyond the current frame, or
//! the head of a frame interrupted by a would-block read, stay buffered
//! for the next call.

use std::io::{ErrorKind, Read};

use tracing::trace;

use super::constants::{CRLF, MAX_SIZE_LINE_LEN, PROBE_LEN};
use super::error::ChunkError;

/// Upper bound for a single socket read while completing a large frame.
const MAX_READ_LEN: usize = 64 * 1024;

/// Reads one chunk frame at a time from a raw socket.
#[derive(Debug, Default)]
pub struct ChunkReader {
    pending: Vec<u8>,
    closed: bool,
    finished: bool,
}

/// Where the buffered bytes stand relative to the next frame.
enum FrameState {
    NeedSizeLine,
    NeedPayload { missing: usize },
    Complete(FrameBounds),
}

#[derive(Clone, Copy)]
struct FrameBounds {
    payload_start: usize,
    size: usize,
    frame_end: usize,
}

impl ChunkReader {
    /// Creates a reader with an empty carry buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reader seeded with body bytes already pulled off the socket,
    /// e.g. read together with the response head.
    #[must_use]
    pub fn with_buffered(prefix: Vec<u8>) -> Self {
        Self {
            pending: prefix,
            ..Self::default()
        }
    }

    /// Returns true once a read returned end-of-file.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns true once the zero-size frame that ends the body was read.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of raw bytes held back for the next frame.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true when the next [`read_chunk`](Self::read_chunk) call can
    /// finish without touching the socket (a full frame, or a framing error,
    /// is already buffered).
    #[must_use]
    pub fn has_buffered_frame(&self) -> bool {
        !matches!(
            self.frame_state(),
            Ok(FrameState::NeedSizeLine | FrameState::NeedPayload { .. })
        )
    }

    /// Reads the next frame and returns its payload.
    ///
    /// An empty payload means either the zero-size end frame or a closed
    /// socket; [`is_finished`](Self::is_finished) and
    /// [`is_closed`](Self::is_closed) tell them apart.
    ///
    /// # Errors
    ///
    /// - [`ChunkError::WouldBlock`] when a non-blocking socket has no data;
    ///   the partial frame is kept and the next call resumes it.
    /// - [`ChunkError::ShortRead`] when the socket closes mid-frame.
    /// - [`ChunkError::InvalidSize`], [`ChunkError::SizeLineTooLong`] and
    ///   [`ChunkError::MissingTrailer`] for malformed framing.
    /// - [`ChunkError::Io`] for any other socket failure.
    pub fn read_chunk<R: Read + ?Sized>(&mut self, socket: &mut R) -> Result<Vec<u8>, ChunkError> {
        loop {
            let wanted = match self.frame_state()? {
                FrameState::Complete(bounds) => return self.take_frame(bounds),
                FrameState::NeedSizeLine => PROBE_LEN,
                FrameState::NeedPayload { missing } => missing.min(MAX_READ_LEN),
            };

            let read = self.fill_from(socket, wanted)?;
            if read == 0 {
                self.closed = true;
                if self.pending.is_empty() {
                    trace!("socket closed between frames");
                    return Ok(Vec::new());
                }
                return Err(ChunkError::ShortRead { expected: wanted });
            }
        }
    }

    /// Appends up to `wanted` bytes from the socket directly into the carry buffer.
    fn fill_from<R: Read + ?Sized>(
        &mut self,
        socket: &mut R,
        wanted: usize,
    ) -> Result<usize, ChunkError> {
        let start = self.pending.len();
        self.pending.resize(start + wanted, 0);
        let result = loop {
            match socket.read(&mut self.pending[start..]) {
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                other => break other,
            }
        };
        match result {
            Ok(read) => {
                self.pending.truncate(start + read);
                Ok(read)
            }
            Err(e) => {
                self.pending.truncate(start);
                Err(ChunkError::from(e))
            }
        }
    }

    fn frame_state(&self) -> Result<FrameState, ChunkError> {
        let Some(line_end) = find_crlf(&self.pending) else {
            if self.pending.len() > MAX_SIZE_LINE_LEN {
                return Err(ChunkError::SizeLineTooLong {
                    limit: MAX_SIZE_LINE_LEN,
                });
            }
            return Ok(FrameState::NeedSizeLine);
        };
        if line_end > MAX_SIZE_LINE_LEN {
            return Err(ChunkError::SizeLineTooLong {
                limit: MAX_SIZE_LINE_LEN,
            });
        }

        let size = parse_size_line(&self.pending[..line_end])?;
        let payload_start = line_end + CRLF.len();
        let frame_end = payload_start
            .checked_add(size)
            .and_then(|end| end.checked_add(CRLF.len()))
            .ok_or_else(|| ChunkError::InvalidSize {
                line: String::from_utf8_lossy(&self.pending[..line_end]).into_owned(),
            })?;

        if self.pending.len() >= frame_end {
            Ok(FrameState::Complete(FrameBounds {
                payload_start,
                size,
                frame_end,
            }))
        } else {
            Ok(FrameState::NeedPayload {
                missing: frame_end - self.pending.len(),
            })
        }
    }

    fn take_frame(&mut self, bounds: FrameBounds) -> Result<Vec<u8>, ChunkError> {
        let payload_end = bounds.payload_start + bounds.size;
        if &self.pending[payload_end..bounds.frame_end] != CRLF {
            return Err(ChunkError::MissingTrailer { size: bounds.size });
        }
        let payload = self.pending[bounds.payload_start..payload_end].to_vec();
        self.pending.drain(..bounds.frame_end);
        if bounds.size == 0 {
            self.finished = true;
        }
        trace!(
            size = bounds.size,
            carried = self.pending.len(),
            "chunk frame read"
        );
        Ok(payload)
    }
}

fn find_crlf(bytes: &[u8]) -> Option<usize> {
    bytes.windows(CRLF.len()).position(|window| window == CRLF)
}

/// Parses a chunk-size line, ignoring any `;name=value` extensions.
fn parse_size_line(line: &[u8]) -> Result<usize, ChunkError> {
    let invalid = || ChunkError::InvalidSize {
        line: String::from_utf8_lossy(line).into_owned(),
    };
    let digits = line.split(|&b| b == b';').next().unwrap_or_default();
    let digits = digits.trim_ascii();
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(invalid());
    }
    let text = std::str::from_utf8(digits).map_err(|_| invalid())?;
    usize::from_str_radix(text, 16).map_err(|_| invalid())
}
