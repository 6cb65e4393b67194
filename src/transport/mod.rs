//! Raw byte stream under a websocket connection.
//!
//! After the handshake the connection owns its transport exclusively.
//! [`Guarded`] adds a deadline and a [`CancelToken`] on top of any
//! transport, they are checked before each read or write.

mod guard;

pub use guard::{Guarded, CancelToken};

use std::io::{Read, Write, Result, ErrorKind};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

/// Bidirectional byte stream that can be closed.
pub trait Transport: Read + Write {
    /// Close both directions. Calling it more than once must not fail.
    fn close(&mut self) -> Result<()> { self.flush() }

    /// Bound the time a single read or write may block.
    /// Transports without native timeouts ignore it.
    fn set_io_timeout(&mut self, _timeout: Option<Duration>) -> Result<()> { Ok(()) }
}

#[inline]
fn ignore_not_connected(res: Result<()>) -> Result<()> {
    match res {
        Err(ref e) if e.kind() == ErrorKind::NotConnected => Ok(()),
        res => res,
    }
}

impl Transport for TcpStream {
    fn close(&mut self) -> Result<()> { ignore_not_connected(self.shutdown(Shutdown::Both)) }

    fn set_io_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.set_read_timeout(timeout)?;
        self.set_write_timeout(timeout)
    }
}

#[cfg(unix)]
impl Transport for std::os::unix::net::UnixStream {
    fn close(&mut self) -> Result<()> { ignore_not_connected(self.shutdown(Shutdown::Both)) }

    fn set_io_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.set_read_timeout(timeout)?;
        self.set_write_timeout(timeout)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    #[inline]
    fn close(&mut self) -> Result<()> { (**self).close() }

    #[inline]
    fn set_io_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        (**self).set_io_timeout(timeout)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    #[inline]
    fn close(&mut self) -> Result<()> { (**self).close() }

    #[inline]
    fn set_io_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        (**self).set_io_timeout(timeout)
    }
}
