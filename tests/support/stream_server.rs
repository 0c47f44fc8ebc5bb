//! One-shot loopback HTTP server that replays a scripted chunked response.

use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::socket_guard::bind_loopback_or_skip;

pub const CHUNKED_OK_HEAD: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Type: application/json\r\n\
X-Stream-Id: 42\r\n\
Transfer-Encoding: chunked\r\n\r\n";

/// One thing the server does after reading the request.
#[derive(Debug, Clone)]
pub enum Action {
    Send(Vec<u8>),
    Pause(Duration),
}

impl Action {
    pub fn send(bytes: &[u8]) -> Self {
        Self::Send(bytes.to_vec())
    }

    pub fn chunk(payload: &[u8]) -> Self {
        Self::Send(chunk(payload))
    }

    pub fn pause_ms(millis: u64) -> Self {
        Self::Pause(Duration::from_millis(millis))
    }
}

/// Frames one payload as a chunk.
pub fn chunk(payload: &[u8]) -> Vec<u8> {
    let mut framed = format!("{:x}\r\n", payload.len()).into_bytes();
    framed.extend_from_slice(payload);
    framed.extend_from_slice(b"\r\n");
    framed
}

/// Accepts a single connection, records the request, plays the actions and
/// closes the connection.
pub struct StreamServer {
    addr: SocketAddr,
    requests: Receiver<String>,
    handle: Option<JoinHandle<()>>,
}

impl StreamServer {
    /// Returns `None` (after logging a skip message) when loopback sockets are unavailable.
    #[track_caller]
    pub fn start(actions: Vec<Action>) -> Option<Self> {
        let listener = bind_loopback_or_skip()?;
        Some(Self::serve(listener, actions))
    }

    fn serve(listener: TcpListener, actions: Vec<Action>) -> Self {
        let addr = listener.local_addr().unwrap();
        let (tx, requests) = mpsc::channel();
        let handle = thread::spawn(move || {
            let Some(mut socket) = accept_within(&listener, Duration::from_secs(5)) else {
                return;
            };
            let request = read_request(&mut socket);
            let _ = tx.send(request);
            for action in actions {
                match action {
                    Action::Send(bytes) => {
                        if socket.write_all(&bytes).and_then(|()| socket.flush()).is_err() {
                            return;
                        }
                    }
                    Action::Pause(duration) => thread::sleep(duration),
                }
            }
        });
        Self {
            addr,
            requests,
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// The raw request (head plus body) the client sent.
    pub fn request(&self) -> String {
        self.requests
            .recv_timeout(Duration::from_secs(5))
            .expect("client request within 5s")
    }
}

impl Drop for StreamServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn accept_within(listener: &TcpListener, limit: Duration) -> Option<TcpStream> {
    listener.set_nonblocking(true).ok()?;
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        match listener.accept() {
            Ok((socket, _)) => {
                socket.set_nonblocking(false).ok()?;
                return Some(socket);
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(Duration::from_millis(5)),
            Err(_) => return None,
        }
    }
    None
}

fn read_request(socket: &mut TcpStream) -> String {
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let mut raw = Vec::new();
    let mut block = [0u8; 512];
    let head_end = loop {
        if let Some(position) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break position + 4;
        }
        match socket.read(&mut block) {
            Ok(0) | Err(_) => return String::from_utf8_lossy(&raw).into_owned(),
            Ok(read) => raw.extend_from_slice(&block[..read]),
        }
    };

    let head = String::from_utf8_lossy(&raw[..head_end]).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while raw.len() < head_end + content_length {
        match socket.read(&mut block) {
            Ok(0) | Err(_) => break,
            Ok(read) => raw.extend_from_slice(&block[..read]),
        }
    }
    String::from_utf8_lossy(&raw).into_owned()
}
