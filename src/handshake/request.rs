//! Client upgrade request.
//!
//! From [RFC-6455 Section 4.1](https://datatracker.ietf.org/doc/html/rfc6455#section-4.1):
//!
//! Once a connection to the server has been established (including a
//! connection via a proxy or over a TLS-encrypted tunnel), the client
//! MUST send an opening handshake to the server.  The handshake consists
//! of an HTTP Upgrade request, along with a list of required and
//! optional header fields.
//!
//! Example:
//!
//! ```text
//! GET /path HTTP/1.1
//! Host: www.example.com
//! Upgrade: websocket
//! Connection: Upgrade
//! Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==
//! Sec-WebSocket-Version: 13
//! ```
//!
//! The request is only parsed here, checks are left to the
//! [`Negotiator`](crate::negotiate::Negotiator).

use super::HttpHeader;
use super::MAX_ALLOW_HEADERS;

use crate::error::HandshakeError;

/// Http request presentation, borrowing the buffer it was parsed from.
#[derive(Debug)]
pub struct Request<'h, 'b: 'h> {
    pub method: &'b [u8],
    pub path: &'b [u8],
    /// minor version, 1 for HTTP/1.1
    pub version: u8,
    pub headers: &'h mut [HttpHeader<'b>],
}

impl<'h, 'b: 'h> Request<'h, 'b> {
    /// Create with user provided headers, other fields are left empty.
    #[inline]
    pub fn new(headers: &'h mut [HttpHeader<'b>]) -> Self {
        Self {
            method: b"",
            path: b"",
            version: 1,
            headers,
        }
    }

    /// Parse from a provided buffer, save the results, and
    /// return the number of bytes parsed.
    ///
    /// At most [`MAX_ALLOW_HEADERS`] headers are parsed, they are stored
    /// in `headers`, which will be shrunk to fit the number of stored headers.
    /// If the buffer does not contain a complete http request head,
    /// a [`HandshakeError::NotEnoughData`] error will be returned.
    pub fn decode(&mut self, buf: &'b [u8]) -> Result<usize, HandshakeError> {
        let mut headers = [httparse::EMPTY_HEADER; MAX_ALLOW_HEADERS];
        let mut request = httparse::Request::new(&mut headers);

        // return value
        let decode_n = match request.parse(buf)? {
            httparse::Status::Complete(n) => n,
            httparse::Status::Partial => return Err(HandshakeError::NotEnoughData),
        };

        // headers are shrunk to number of inited headers
        // ref: https://docs.rs/httparse/latest/src/httparse/lib.rs.html#757-765
        let parsed = request.headers;
        if parsed.len() > self.headers.len() {
            return Err(HandshakeError::NotEnoughCapacity);
        }

        for (dst, src) in self.headers.iter_mut().zip(parsed.iter()) {
            dst.name = src.name.as_bytes();
            dst.value = src.value;
        }

        // a complete request always carries these
        self.method = request.method.unwrap_or_default().as_bytes();
        self.path = request.path.unwrap_or_default().as_bytes();
        self.version = request.version.unwrap_or_default();

        // shrink header reference
        let headers = std::mem::take(&mut self.headers);
        self.headers = &mut headers[..parsed.len()];

        Ok(decode_n)
    }

    /// Get all headers with the given name (case insensitive).
    #[inline]
    pub fn headers_named<'a>(
        &'a self,
        name: &'a [u8],
    ) -> impl Iterator<Item = &'a HttpHeader<'b>> + 'a {
        self.headers
            .iter()
            .filter(move |h| h.name.eq_ignore_ascii_case(name))
    }

    /// Get the value of the first header with the given name.
    #[inline]
    pub fn header(&self, name: &[u8]) -> Option<&'b [u8]> {
        self.headers_named(name).next().map(|h| h.value)
    }

    /// Check if any header with the given name contains the token.
    #[inline]
    pub fn has_token(&self, name: &[u8], token: &[u8]) -> bool {
        self.headers_named(name).any(|h| h.contains_token(token))
    }
}
