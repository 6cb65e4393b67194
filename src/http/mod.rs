//! Minimal http layer in front of the negotiator.
//!
//! The negotiator only needs two things from an http server: a way to
//! answer with an error status, and a way to take the connection over
//! once the upgrade is accepted. Both are described by [`ResponseWriter`].
//!
//! - [`RawResponse`], produced by [`read_request`], writes directly to
//!   a raw stream and can hand it over.
//! - [`ResponseRecorder`] only records what it is asked to write.

mod raw;
mod recorder;

pub use raw::{RawResponse, read_request};
pub use recorder::ResponseRecorder;

use std::io::{self, Read, Write};
use std::fmt::{Display, Formatter};

use crate::transport::Transport;

/// Status codes answered by the negotiator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    BadRequest = 400,
    MethodNotAllowed = 405,
    InternalServerError = 500,
}

impl StatusCode {
    #[inline]
    pub const fn as_u16(self) -> u16 { self as u16 }

    #[inline]
    pub const fn reason(self) -> &'static str {
        use StatusCode::*;
        match self {
            BadRequest => "Bad Request",
            MethodNotAllowed => "Method Not Allowed",
            InternalServerError => "Internal Server Error",
        }
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}

/// A transport taken over from the http layer.
#[derive(Debug)]
pub struct Hijacked<IO> {
    pub io: IO,
    /// Bytes the http layer had already read past the request head.
    pub buffered: Vec<u8>,
}

/// Reasons a transport could not be taken over.
#[derive(Debug)]
pub enum HijackError {
    /// The writer is not backed by a raw stream.
    Unsupported,

    /// The stream has already been taken over.
    Taken,

    Io(io::Error),
}

impl Display for HijackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use HijackError::*;
        match self {
            Unsupported => write!(f, "Transport takeover is not supported"),
            Taken => write!(f, "Transport has already been taken over"),
            Io(e) => write!(f, "Io error: {}", e),
        }
    }
}

impl std::error::Error for HijackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HijackError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for HijackError {
    fn from(e: io::Error) -> Self { HijackError::Io(e) }
}

/// Writer of the response to an upgrade request.
pub trait ResponseWriter {
    /// Transport handed over by [`hijack`](Self::hijack).
    type Io: Transport;

    /// Answer with an error status and a short plain text body.
    fn write_error(&mut self, status: StatusCode) -> io::Result<()>;

    /// Take the underlying transport over. After a successful call
    /// the http layer no longer touches the connection.
    fn hijack(&mut self) -> Result<Hijacked<Self::Io>, HijackError> {
        Err(HijackError::Unsupported)
    }
}

/// Transport of writers that never hand one over.
#[derive(Debug)]
pub enum NoTransport {}

impl Read for NoTransport {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> { match *self {} }
}

impl Write for NoTransport {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> { match *self {} }

    fn flush(&mut self) -> io::Result<()> { match *self {} }
}

impl Transport for NoTransport {}
