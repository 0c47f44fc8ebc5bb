//! Chunk framing limits.

/// Size of the initial read that is expected to hold the whole chunk-size line.
pub const PROBE_LEN: usize = 8;

/// Longest chunk-size line accepted before the framing is considered broken.
///
/// Covers 16 hex digits plus a short chunk extension.
pub const MAX_SIZE_LINE_LEN: usize = 64;

/// Frame delimiter used by the size line and the payload trailer.
pub const CRLF: &[u8] = b"\r\n";
