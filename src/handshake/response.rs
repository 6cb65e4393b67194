//! Server handshake response.
//!
//! From [RFC-6455 Section 4.2](https://datatracker.ietf.org/doc/html/rfc6455#section-4.2):
//!
//! If the server chooses to accept the incoming connection, it MUST
//! reply with a valid HTTP response.
//!
//! Example:
//!
//! ```text
//! HTTP/1.1 101 Switching Protocols
//! Upgrade: websocket
//! Connection: Upgrade
//! Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=
//! ```
//!
//! A rejected request is answered with a short plain text error instead.

use super::HttpHeader;
use super::write_header;
use super::{HTTP_STATUS_LINE, HTTP_VERSION, HTTP_LINE_BREAK, HTTP_HEADER_SP};
use super::static_headers::*;

use crate::bleed::Writer;
use crate::error::HandshakeError;
use crate::http::StatusCode;

/// Room for a `101 Switching Protocols` response, which takes 129 bytes.
pub const MAX_RESPONSE_LEN: usize = 256;

/// `101 Switching Protocols` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response<'b> {
    pub sec_accept: &'b [u8],
}

impl<'b> Response<'b> {
    #[inline]
    pub const fn new(sec_accept: &'b [u8]) -> Self { Self { sec_accept } }

    /// Encode to a provided buffer, return the number of written bytes.
    ///
    /// `Upgrade`, `Connection`, and `Sec-WebSocket-Accept` are written,
    /// in this order.
    ///
    /// Caller should make sure the buffer is large enough,
    /// otherwise a [`HandshakeError::NotEnoughCapacity`] error will be returned.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, HandshakeError> {
        let mut w = Writer::new(buf);
        let e = || HandshakeError::NotEnoughCapacity;

        // HTTP/1.1 101 Switching Protocols
        w.write_or_err(HTTP_STATUS_LINE, e)?;
        w.write_or_err(HTTP_LINE_BREAK, e)?;

        // Upgrade: websocket
        write_header!(w, HEADER_UPGRADE_NAME, HEADER_UPGRADE_VALUE);

        // Connection: Upgrade
        write_header!(w, HEADER_CONNECTION_NAME, HEADER_CONNECTION_VALUE);

        // Sec-WebSocket-Accept: {sec_accept}
        write_header!(w, HEADER_SEC_WEBSOCKET_ACCEPT_NAME, self.sec_accept);

        // finish with CRLF
        w.write_or_err(HTTP_LINE_BREAK, e)?;

        Ok(w.pos())
    }
}

/// Plain text error response, the connection is closed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: StatusCode,
}

impl ErrorResponse {
    #[inline]
    pub const fn new(status: StatusCode) -> Self { Self { status } }

    /// Encode to a provided buffer, return the number of written bytes.
    ///
    /// The body is the reason phrase followed by a line feed.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, HandshakeError> {
        let mut w = Writer::new(buf);
        let e = || HandshakeError::NotEnoughCapacity;

        let code = self.status.as_u16().to_string();
        let reason = self.status.reason().as_bytes();
        let body_len = (reason.len() + 1).to_string();

        // HTTP/1.1 {code} {reason}
        w.write_or_err(HTTP_VERSION, e)?;
        w.write_or_err(b" ", e)?;
        w.write_or_err(code.as_bytes(), e)?;
        w.write_or_err(b" ", e)?;
        w.write_or_err(reason, e)?;
        w.write_or_err(HTTP_LINE_BREAK, e)?;

        write_header!(w, HEADER_CONTENT_TYPE_NAME, HEADER_CONTENT_TYPE_VALUE);
        write_header!(w, HEADER_CONTENT_LENGTH_NAME, body_len.as_bytes());
        write_header!(w, HEADER_CONNECTION_NAME, HEADER_CONNECTION_CLOSE_VALUE);
        w.write_or_err(HTTP_LINE_BREAK, e)?;

        // body
        w.write_or_err(reason, e)?;
        w.write_or_err(b"\n", e)?;

        Ok(w.pos())
    }
}
