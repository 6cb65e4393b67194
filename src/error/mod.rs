#![allow(missing_docs)]
//! Errors

mod frame;
mod handshake;

pub use frame::FrameError;
pub use handshake::HandshakeError;

use std::fmt::{Display, Formatter};

/// Who ended the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedBy {
    /// A `Close` frame was received.
    Peer,

    /// The transport reached `EOF` between two frames.
    Eof,

    /// [`FramedConnection::close`](crate::conn::FramedConnection::close) was called.
    Local,
}

#[derive(Debug)]
pub enum Error {
    Frame(FrameError),

    Handshake(HandshakeError),

    Io(std::io::Error),

    Closed(ClosedBy),
}

impl Error {
    /// Check if the connection has been closed in an orderly way,
    /// which is the normal end of a message loop.
    #[inline]
    pub const fn is_closed(&self) -> bool { matches!(self, Error::Closed(_)) }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self { Error::Frame(e) }
}

impl From<HandshakeError> for Error {
    fn from(e: HandshakeError) -> Self { Error::Handshake(e) }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error { Error::Io(e) }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        use std::io::ErrorKind;
        match e {
            Error::Io(e) => e,
            Error::Closed(_) => ErrorKind::ConnectionAborted.into(),
            e => std::io::Error::new(ErrorKind::InvalidData, e),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Error::*;
        match self {
            Frame(e) => write!(f, "Frame error: {}", e),
            Handshake(e) => write!(f, "Handshake error: {}", e),
            Io(e) => write!(f, "Io error: {}", e),
            Closed(ClosedBy::Peer) => write!(f, "Connection closed by peer"),
            Closed(ClosedBy::Eof) => write!(f, "Connection reached EOF"),
            Closed(ClosedBy::Local) => write!(f, "Connection already closed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use Error::*;

        match self {
            Frame(e) => Some(e),
            Handshake(e) => Some(e),
            Io(e) => Some(e),
            Closed(_) => None,
        }
    }
}
