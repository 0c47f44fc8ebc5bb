//! Raw byte-stream boundary between the HTTP layer and the chunk reader.
//!
//! The decoder never touches an HTTP client's internals. Whatever opened the
//! connection hands over a value implementing [`RawSocket`]: partial reads,
//! a blocking-mode toggle, the keep-alive socket option and a readiness wait.

use std::io::{self, Read};
use std::net::TcpStream;
use std::time::Duration;

use socket2::SockRef;

/// Shortest readiness wait; a zero read timeout is rejected by the OS layer.
const MIN_WAIT: Duration = Duration::from_millis(1);

/// A readable byte stream with socket-level controls.
pub trait RawSocket: Read {
    /// Switches the socket between blocking and non-blocking reads.
    ///
    /// # Errors
    ///
    /// Returns the OS error when the mode cannot be changed.
    fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()>;

    /// Enables or disables TCP keep-alive on the connection.
    ///
    /// # Errors
    ///
    /// Returns the OS error when the option cannot be set.
    fn set_keepalive(&self, enabled: bool) -> io::Result<()>;

    /// Waits up to `timeout` for the socket to become readable.
    ///
    /// Returns `Ok(true)` when a read would not block (data or end-of-file),
    /// `Ok(false)` when the timeout elapsed first.
    ///
    /// # Errors
    ///
    /// Returns the OS error when the wait itself fails.
    fn wait_readable(&self, timeout: Duration) -> io::Result<bool>;
}

impl<S: RawSocket + ?Sized> RawSocket for Box<S> {
    fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        (**self).set_nonblocking(nonblocking)
    }

    fn set_keepalive(&self, enabled: bool) -> io::Result<()> {
        (**self).set_keepalive(enabled)
    }

    fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
        (**self).wait_readable(timeout)
    }
}

impl RawSocket for TcpStream {
    fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        TcpStream::set_nonblocking(self, nonblocking)
    }

    fn set_keepalive(&self, enabled: bool) -> io::Result<()> {
        SockRef::from(self).set_keepalive(enabled)
    }

    /// Peeks one byte under a read timeout, then puts the socket back into
    /// non-blocking mode.
    fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
        self.set_read_timeout(Some(timeout.max(MIN_WAIT)))?;
        TcpStream::set_nonblocking(self, false)?;
        let mut next_byte = [0u8; 1];
        let outcome = match self.peek(&mut next_byte) {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(false)
            }
            Err(e) => Err(e),
        };
        TcpStream::set_nonblocking(self, true)?;
        self.set_read_timeout(None)?;
        outcome
    }
}
