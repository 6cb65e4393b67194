use std::fmt::{Display, Formatter};

use crate::http::StatusCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeError {
    // http error
    HttpMethod,

    // websocket error
    Upgrade,

    Connection,

    SecWebSocketKey,

    SecWebSocketVersion,

    // transport error
    Hijack,

    PreHandshakeData(usize),

    // other error

    // read
    NotEnoughData,

    // write
    NotEnoughCapacity,

    Httparse(httparse::Error),
}

impl HandshakeError {
    /// Http status answered to the client when this error occurs
    /// before the transport is taken over.
    ///
    /// Returns `None` if no response could be written.
    pub const fn status(&self) -> Option<StatusCode> {
        use HandshakeError::*;
        match self {
            HttpMethod => Some(StatusCode::MethodNotAllowed),
            Upgrade | Connection | SecWebSocketKey | SecWebSocketVersion | Hijack => {
                Some(StatusCode::BadRequest)
            }
            NotEnoughCapacity | Httparse(_) => Some(StatusCode::BadRequest),
            PreHandshakeData(_) | NotEnoughData => None,
        }
    }
}

impl Display for HandshakeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use HandshakeError::*;
        match self {
            // http error
            HttpMethod => write!(f, "Illegal http method, expect GET"),

            // websocket error
            Upgrade => write!(f, "Missing upgrade header with token 'websocket'"),

            Connection => write!(f, "Missing connection header with token 'upgrade'"),

            SecWebSocketKey => write!(f, "Missing or blank sec-websocket-key header"),

            SecWebSocketVersion => {
                write!(f, "Missing or illegal sec-websocket-version, expect 13")
            }

            // transport error
            Hijack => write!(f, "Response writer does not support transport takeover"),

            PreHandshakeData(n) => {
                write!(f, "Client sent {} bytes before handshake is complete", n)
            }

            // other error
            NotEnoughData => write!(f, "Not enough data to parse"),

            NotEnoughCapacity => write!(f, "Not enough space to write to"),

            Httparse(e) => write!(f, "Http parse error: {}", e),
        }
    }
}

impl From<httparse::Error> for HandshakeError {
    fn from(e: httparse::Error) -> Self { HandshakeError::Httparse(e) }
}

impl std::error::Error for HandshakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let HandshakeError::Httparse(e) = self {
            Some(e)
        } else {
            None
        }
    }
}
