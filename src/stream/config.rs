//! Per-stream consumption policy.

use std::time::Duration;

/// How a stream waits for data. Exactly one mode applies to a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// Blocking socket; reads wait until data arrives or the peer closes.
    Blocking,
    /// Non-blocking socket plus a readiness wait bounded by the duration.
    /// An idle stream yields a timeout event and stays open.
    IdleTimeout(Duration),
    /// Non-blocking socket; a pull with nothing ready yields a no-data event.
    NonBlocking,
}

impl StreamMode {
    /// Returns true when the socket must be left in blocking mode.
    #[must_use]
    pub fn uses_blocking_socket(self) -> bool {
        matches!(self, Self::Blocking)
    }

    /// Returns true when would-block reads are an expected outcome.
    #[must_use]
    pub fn tolerates_would_block(self) -> bool {
        !self.uses_blocking_socket()
    }
}

/// Configuration fixed when a stream is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Block the caller while waiting for data (default `true`).
    pub blocking: bool,
    /// Idle timeout; only meaningful when `blocking` is true.
    pub timeout: Option<Duration>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            blocking: true,
            timeout: None,
        }
    }
}

impl StreamConfig {
    /// Blocking forever.
    #[must_use]
    pub fn blocking() -> Self {
        Self::default()
    }

    /// Blocking with an idle timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            blocking: true,
            timeout: Some(timeout),
        }
    }

    /// Non-blocking polling.
    #[must_use]
    pub fn non_blocking() -> Self {
        Self {
            blocking: false,
            timeout: None,
        }
    }

    /// Resolves the two flags into one mode. A zero timeout means no timeout,
    /// and a timeout is ignored when `blocking` is false.
    #[must_use]
    pub fn mode(&self) -> StreamMode {
        match (self.blocking, self.timeout) {
            (false, _) => StreamMode::NonBlocking,
            (true, Some(timeout)) if !timeout.is_zero() => StreamMode::IdleTimeout(timeout),
            (true, _) => StreamMode::Blocking,
        }
    }
}
