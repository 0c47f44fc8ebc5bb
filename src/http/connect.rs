//! Opening a streaming connection over plain TCP.

use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::error::HttpError;
use super::request::StreamRequest;
use super::response::read_response_head;
use crate::stream::StreamResponse;

/// Connects, sends the request and reads the response head.
///
/// The returned [`StreamResponse`] owns the raw socket positioned at the
/// start of the chunked body (minus any bytes kept in `body_prefix`).
///
/// # Errors
///
/// - [`HttpError::InvalidUrl`] / [`HttpError::UnsupportedScheme`] for bad URLs
/// - [`HttpError::Connect`] when no address accepts the connection
/// - [`HttpError::Io`] / [`HttpError::MalformedResponse`] during the exchange
/// - [`HttpError::Status`] for non-2xx responses
/// - [`HttpError::NotChunked`] when the body is not chunked
#[instrument(skip(request), fields(uri = %request.uri()))]
pub fn open_stream(request: &StreamRequest) -> Result<StreamResponse<TcpStream>, HttpError> {
    let uri = request.uri();
    let url = request.target_url()?;
    let wire = request.to_wire(&url)?;

    let addrs = url
        .socket_addrs(|| Some(80))
        .map_err(|e| HttpError::connect(&uri, e))?;
    let mut socket =
        connect_any(&addrs, request.timeout()).map_err(|e| HttpError::connect(&uri, e))?;

    // Bound the handshake; the decoder decides how the body is waited on.
    socket
        .set_read_timeout(Some(request.timeout()))
        .and_then(|()| socket.set_write_timeout(Some(request.timeout())))
        .map_err(|e| HttpError::io(&uri, e))?;

    socket
        .write_all(&wire)
        .and_then(|()| socket.flush())
        .map_err(|e| HttpError::io(&uri, e))?;
    debug!(bytes = wire.len(), method = request.method().as_str(), "request sent");

    let (head, body_prefix) = read_response_head(&mut socket, &uri)?;
    if !head.is_success() {
        warn!(status = head.status(), reason = %head.reason, "stream request rejected");
        return Err(HttpError::status(uri, head.status(), head.reason));
    }
    if !head.headers.is_chunked() {
        return Err(HttpError::NotChunked {
            url: uri,
            transfer_encoding: head
                .headers
                .get("transfer-encoding")
                .unwrap_or_default()
                .to_string(),
        });
    }

    socket
        .set_read_timeout(None)
        .and_then(|()| socket.set_write_timeout(None))
        .map_err(|e| HttpError::io(&uri, e))?;

    info!(
        status = head.status(),
        prefix_bytes = body_prefix.len(),
        "stream connected"
    );
    Ok(StreamResponse::new(head.headers, socket).with_body_prefix(body_prefix))
}

/// Tries each resolved address in turn.
fn connect_any(addrs: &[SocketAddr], timeout: Duration) -> io::Result<TcpStream> {
    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(socket) => {
                debug!(%addr, "tcp connected");
                return Ok(socket);
            }
            Err(e) => {
                debug!(%addr, error = %e, "tcp connect failed");
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "host resolved to no addresses")
    }))
}
