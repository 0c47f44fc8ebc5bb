//! Response head reading and parsing.

use std::io::{ErrorKind, Read};

use super::constants::{HEAD_READ_LEN, MAX_HEAD_LEN};
use super::error::HttpError;
use crate::stream::ResponseHeaders;

const HEAD_END: &[u8] = b"\r\n\r\n";

/// A parsed status line plus header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub headers: ResponseHeaders,
    pub reason: String,
}

impl ResponseHead {
    #[must_use]
    pub fn status(&self) -> u16 {
        self.headers.status()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }
}

/// Reads the response head from the socket.
///
/// Returns the parsed head and any body bytes that arrived in the same reads.
pub(crate) fn read_response_head<R: Read + ?Sized>(
    socket: &mut R,
    url: &str,
) -> Result<(ResponseHead, Vec<u8>), HttpError> {
    let mut head = Vec::with_capacity(HEAD_READ_LEN);
    let mut block = [0u8; HEAD_READ_LEN];
    loop {
        let read = match socket.read(&mut block) {
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(HttpError::io(url, e)),
        };
        if read == 0 {
            return Err(HttpError::malformed(
                url,
                "connection closed before end of response head",
            ));
        }

        let search_from = head.len().saturating_sub(HEAD_END.len() - 1);
        head.extend_from_slice(&block[..read]);
        if let Some(position) = head[search_from..]
            .windows(HEAD_END.len())
            .position(|window| window == HEAD_END)
        {
            let body_start = search_from + position + HEAD_END.len();
            let body_prefix = head.split_off(body_start);
            let parsed = parse_response_head(&head, url)?;
            return Ok((parsed, body_prefix));
        }
        if head.len() > MAX_HEAD_LEN {
            return Err(HttpError::malformed(
                url,
                format!("response head exceeds {MAX_HEAD_LEN} bytes"),
            ));
        }
    }
}

/// Parses `HTTP/1.x <status> <reason>` followed by header lines.
///
/// # Errors
///
/// Returns [`HttpError::MalformedResponse`] for a bad status line or header line.
pub fn parse_response_head(head: &[u8], url: &str) -> Result<ResponseHead, HttpError> {
    let text = String::from_utf8_lossy(head);
    let mut lines = text.split("\r\n");

    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/1.") {
        return Err(HttpError::malformed(
            url,
            format!("unexpected status line {status_line:?}"),
        ));
    }
    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .filter(|code| (100..=999).contains(code))
        .ok_or_else(|| HttpError::malformed(url, format!("bad status code in {status_line:?}")))?;
    let reason = parts.next().unwrap_or_default().trim().to_string();

    let mut entries = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            return Err(HttpError::malformed(
                url,
                format!("bad header line {line:?}"),
            ));
        };
        entries.push((name.trim().to_string(), value.trim().to_string()));
    }

    Ok(ResponseHead {
        headers: ResponseHeaders::new(status, entries),
        reason,
    })
}
