//! Constants for the HTTP connection layer.

/// Default TCP connect (and response-head read) timeout in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Largest response head accepted before the response is rejected.
pub const MAX_HEAD_LEN: usize = 64 * 1024;

/// Read block size while receiving the response head.
pub const HEAD_READ_LEN: usize = 1024;
