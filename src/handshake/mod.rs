//! Websocket handshake.

pub mod key;
pub mod request;
pub mod response;

pub use request::Request;
pub use response::{Response, ErrorResponse};
pub use key::{new_sec_key, derive_accept_key};

/// 32
pub const MAX_ALLOW_HEADERS: usize = 32;

/// Empty header with dummy reference
pub const EMPTY_HEADER: HttpHeader = HttpHeader::new(b"", b"");

/// 258EAFA5-E914-47DA-95CA-C5AB0DC85B11
pub const GUID: &[u8] = b"258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// GET
pub const HTTP_METHOD: &[u8] = b"GET";

/// HTTP/1.1
pub const HTTP_VERSION: &[u8] = b"HTTP/1.1";

/// CRLF
pub const HTTP_LINE_BREAK: &[u8] = b"\r\n";

/// A colon + one SP is prefered
pub const HTTP_HEADER_SP: &[u8] = b": ";

/// HTTP/1.1 101 Switching Protocols
pub const HTTP_STATUS_LINE: &[u8] = b"HTTP/1.1 101 Switching Protocols";

/// Http header, take two references
#[allow(clippy::len_without_is_empty)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HttpHeader<'h> {
    pub name: &'h [u8],
    pub value: &'h [u8],
}

impl<'h> HttpHeader<'h> {
    /// Constructor, take provided name and value.
    #[inline]
    pub const fn new(name: &'h [u8], value: &'h [u8]) -> Self { Self { name, value } }

    /// Total number of bytes(name + value + sp).
    #[inline]
    pub const fn len(&self) -> usize {
        self.name.len() + self.value.len() + HTTP_HEADER_SP.len() + HTTP_LINE_BREAK.len()
    }

    /// Create [`MAX_ALLOW_HEADERS`] empty headers.
    #[inline]
    pub const fn new_storage() -> [HttpHeader<'static>; MAX_ALLOW_HEADERS] {
        [EMPTY_HEADER; MAX_ALLOW_HEADERS]
    }

    /// Create N empty headers.
    #[inline]
    pub const fn new_custom_storage<const N: usize>() -> [HttpHeader<'static>; N] {
        [EMPTY_HEADER; N]
    }

    /// Check if the value, as a comma separated list,
    /// contains the token (case insensitive).
    #[inline]
    pub fn contains_token(&self, token: &[u8]) -> bool {
        self.value
            .split(|b| *b == b',')
            .any(|t| trim(t).eq_ignore_ascii_case(token))
    }
}

impl Default for HttpHeader<'static> {
    fn default() -> Self { EMPTY_HEADER }
}

impl<'h> std::fmt::Display for HttpHeader<'h> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            String::from_utf8_lossy(self.name),
            String::from_utf8_lossy(self.value)
        )
    }
}

#[inline]
fn trim(mut b: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = b {
        if first.is_ascii_whitespace() {
            b = rest;
        } else {
            break;
        }
    }
    while let [rest @ .., last] = b {
        if last.is_ascii_whitespace() {
            b = rest;
        } else {
            break;
        }
    }
    b
}

macro_rules! header {
    (   $(
            ($hdr_name: ident => $name: expr);
        )+
    ) => {
        $(
            pub const $hdr_name: &[u8] = $name;
        )+
    };
}

macro_rules! write_header {
    ($w: expr, $name: expr, $value: expr) => {{
        let hdr = HttpHeader::new($name, $value);
        if $w.remaining() < hdr.len() {
            return Err(HandshakeError::NotEnoughCapacity);
        }
        let e = || HandshakeError::NotEnoughCapacity;
        $w.write_or_err(hdr.name, e)?;
        $w.write_or_err(HTTP_HEADER_SP, e)?;
        $w.write_or_err(hdr.value, e)?;
        $w.write_or_err(HTTP_LINE_BREAK, e)?;
    }};
}

pub(self) use write_header;

/// Static http headers
#[allow(unused)]
pub mod static_headers {
    // header name, as written in a response
    header! {
        (HEADER_UPGRADE_NAME => b"Upgrade");

        (HEADER_CONNECTION_NAME => b"Connection");

        (HEADER_SEC_WEBSOCKET_KEY_NAME => b"Sec-WebSocket-Key");

        (HEADER_SEC_WEBSOCKET_ACCEPT_NAME => b"Sec-WebSocket-Accept");

        (HEADER_SEC_WEBSOCKET_VERSION_NAME => b"Sec-WebSocket-Version");

        (HEADER_CONTENT_TYPE_NAME => b"Content-Type");

        (HEADER_CONTENT_LENGTH_NAME => b"Content-Length");
    }

    // header value
    header! {
        (HEADER_UPGRADE_VALUE => b"websocket");

        (HEADER_CONNECTION_VALUE => b"Upgrade");

        (HEADER_CONNECTION_TOKEN => b"upgrade");

        (HEADER_SEC_WEBSOCKET_VERSION_VALUE => b"13");

        (HEADER_CONNECTION_CLOSE_VALUE => b"close");

        (HEADER_CONTENT_TYPE_VALUE => b"text/plain; charset=utf-8");
    }
}
