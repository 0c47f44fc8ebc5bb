//! Error types for the stream module.
//!
//! Chunk framing failures are reported as [`ChunkError`] by the chunk reader
//! and wrapped into [`StreamError`] together with the request URI by the
//! decoder, so callers always know which stream broke.

use std::io;

use thiserror::Error;

/// Errors raised while reading a single chunked-transfer-encoding frame.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// The chunk-size line is not a hexadecimal number.
    #[error("invalid chunk size line {line:?}")]
    InvalidSize {
        /// The offending size line, lossily decoded.
        line: String,
    },

    /// No CRLF was found within the allowed size-line length.
    #[error("chunk size line exceeds {limit} bytes without CRLF")]
    SizeLineTooLong {
        /// Maximum accepted size-line length.
        limit: usize,
    },

    /// The payload was not followed by CRLF.
    #[error("chunk of {size} bytes is not terminated by CRLF")]
    MissingTrailer {
        /// Declared payload size of the frame.
        size: usize,
    },

    /// The peer closed the connection in the middle of a frame.
    #[error("connection closed mid-chunk: expected {expected} more bytes")]
    ShortRead {
        /// Bytes still missing to complete the frame (or the size line).
        expected: usize,
    },

    /// The socket is non-blocking and has no data right now.
    ///
    /// Nothing read so far is lost; calling again resumes the frame.
    #[error("socket read would block")]
    WouldBlock,

    /// Any other socket failure.
    #[error("socket read failed: {0}")]
    Io(#[source] io::Error),
}

impl ChunkError {
    /// Returns true for wire-format violations the reader cannot resync from.
    #[must_use]
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::InvalidSize { .. }
                | Self::SizeLineTooLong { .. }
                | Self::MissingTrailer { .. }
                | Self::ShortRead { .. }
        )
    }
}

impl From<io::Error> for ChunkError {
    fn from(error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::WouldBlock {
            Self::WouldBlock
        } else {
            Self::Io(error)
        }
    }
}

/// Errors that end a JSON stream abnormally.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Chunk framing or socket read failure.
    #[error("stream {uri} broken: {source}")]
    Chunk {
        /// URI of the streaming request.
        uri: String,
        /// The underlying chunk error.
        #[source]
        source: ChunkError,
    },

    /// The stream carried bytes that are not valid JSON.
    #[error("stream {uri} carried malformed JSON: {source}")]
    Json {
        /// URI of the streaming request.
        uri: String,
        /// The parser error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuring the socket (keep-alive, blocking mode) or waiting on it failed.
    #[error("socket setup for stream {uri} failed: {source}")]
    Socket {
        /// URI of the streaming request.
        uri: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl StreamError {
    /// Creates a chunk error.
    pub fn chunk(uri: impl Into<String>, source: ChunkError) -> Self {
        Self::Chunk {
            uri: uri.into(),
            source,
        }
    }

    /// Creates a malformed JSON error.
    pub fn json(uri: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            uri: uri.into(),
            source,
        }
    }

    /// Creates a socket setup error.
    pub fn socket(uri: impl Into<String>, source: io::Error) -> Self {
        Self::Socket {
            uri: uri.into(),
            source,
        }
    }

    /// Returns true when the stream broke because of a wire-format violation.
    #[must_use]
    pub fn is_protocol(&self) -> bool {
        match self {
            Self::Chunk { source, .. } => source.is_protocol(),
            Self::Json { .. } => true,
            Self::Socket { .. } => false,
        }
    }
}
