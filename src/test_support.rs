//! Scripted in-memory socket for deterministic stream tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{self, Read};
use std::time::Duration;

use crate::stream::RawSocket;

/// One scripted socket condition.
#[derive(Debug, Clone)]
pub enum Step {
    /// Bytes available to read; a short read leaves the rest for the next read.
    Data(Vec<u8>),
    /// Nothing available right now. A read fails with `WouldBlock`; a
    /// readiness wait sleeps for its timeout and reports "not ready".
    Pending,
}

impl Step {
    pub fn data(bytes: &[u8]) -> Self {
        Self::Data(bytes.to_vec())
    }
}

/// Replays a fixed script; an exhausted script behaves like a closed peer.
#[derive(Debug, Default)]
pub struct ScriptedSocket {
    script: RefCell<VecDeque<Step>>,
    read_sizes: Vec<usize>,
    waits: Cell<usize>,
    nonblocking: Cell<Option<bool>>,
    keepalive: Cell<bool>,
}

impl ScriptedSocket {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: RefCell::new(steps.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Buffer lengths passed to each `read` call, in order.
    pub fn read_sizes(&self) -> Vec<usize> {
        self.read_sizes.clone()
    }

    pub fn read_calls(&self) -> usize {
        self.read_sizes.len()
    }

    pub fn wait_calls(&self) -> usize {
        self.waits.get()
    }

    /// Last blocking mode requested, `None` if never set.
    pub fn nonblocking(&self) -> Option<bool> {
        self.nonblocking.get()
    }

    pub fn keepalive(&self) -> bool {
        self.keepalive.get()
    }
}

impl Read for ScriptedSocket {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_sizes.push(buf.len());
        let mut script = self.script.borrow_mut();
        match script.pop_front() {
            None => Ok(0),
            Some(Step::Pending) => Err(io::Error::new(io::ErrorKind::WouldBlock, "no data")),
            Some(Step::Data(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    script.push_front(Step::Data(bytes[n..].to_vec()));
                }
                Ok(n)
            }
        }
    }
}

impl RawSocket for ScriptedSocket {
    fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        self.nonblocking.set(Some(nonblocking));
        Ok(())
    }

    fn set_keepalive(&self, enabled: bool) -> io::Result<()> {
        self.keepalive.set(enabled);
        Ok(())
    }

    fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
        self.waits.set(self.waits.get() + 1);
        let mut script = self.script.borrow_mut();
        if matches!(script.front(), Some(Step::Pending)) {
            script.pop_front();
            std::thread::sleep(timeout);
            return Ok(false);
        }
        Ok(true)
    }
}

/// Frames `payload` as one chunked-transfer-encoding chunk.
pub fn chunk(payload: &[u8]) -> Vec<u8> {
    let mut frame = format!("{:x}\r\n", payload.len()).into_bytes();
    frame.extend_from_slice(payload);
    frame.extend_from_slice(b"\r\n");
    frame
}
