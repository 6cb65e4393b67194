use std::io::{Read, Write, Result, Error, ErrorKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::Transport;

/// Shared flag used to abort a connection from another thread.
///
/// The flag is checked before each read or write, a call that is
/// already blocked is not woken up. Combine it with a deadline to
/// bound the wait.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[inline]
    pub fn new() -> Self { Self::default() }

    #[inline]
    pub fn cancel(&self) { self.0.store(true, Ordering::Release) }

    #[inline]
    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::Acquire) }
}

/// Transport wrapper honoring a deadline and a [`CancelToken`].
///
/// Before each read or write:
/// - a cancelled token fails with `ConnectionAborted`,
/// - a passed deadline fails with `TimedOut`,
/// - otherwise the inner timeout is narrowed to the time left.
#[derive(Debug)]
pub struct Guarded<IO> {
    io: IO,
    deadline: Option<Instant>,
    cancel: CancelToken,
    timeout_set: bool,
}

impl<IO> Guarded<IO> {
    /// Wrap a transport, with a fresh token and no deadline.
    #[inline]
    pub fn new(io: IO) -> Self { Self::with_cancel(io, CancelToken::new()) }

    #[inline]
    pub fn with_cancel(io: IO, cancel: CancelToken) -> Self {
        Guarded {
            io,
            deadline: None,
            cancel,
            timeout_set: false,
        }
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> { self.deadline }

    /// Set or clear the deadline of all following reads and writes.
    #[inline]
    pub fn set_deadline(&mut self, deadline: Option<Instant>) { self.deadline = deadline; }

    /// Start a new deadline from now, if a timeout is given.
    #[inline]
    pub fn arm(&mut self, timeout: Option<Duration>) {
        if let Some(timeout) = timeout {
            self.deadline = Some(Instant::now() + timeout);
        }
    }

    #[inline]
    pub fn cancel_token(&self) -> &CancelToken { &self.cancel }

    #[inline]
    pub fn get_ref(&self) -> &IO { &self.io }

    #[inline]
    pub fn get_mut(&mut self) -> &mut IO { &mut self.io }

    #[inline]
    pub fn into_inner(self) -> IO { self.io }
}

impl<IO: Transport> Guarded<IO> {
    fn check(&mut self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::new(ErrorKind::ConnectionAborted, "operation cancelled"));
        }

        match self.deadline {
            Some(deadline) => {
                let left = deadline.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    return Err(Error::new(ErrorKind::TimedOut, "deadline exceeded"));
                }
                self.io.set_io_timeout(Some(left))?;
                self.timeout_set = true;
            }
            None if self.timeout_set => {
                self.io.set_io_timeout(None)?;
                self.timeout_set = false;
            }
            None => {}
        }
        Ok(())
    }
}

impl<IO: Transport> Read for Guarded<IO> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.check()?;
        self.io.read(buf)
    }
}

impl<IO: Transport> Write for Guarded<IO> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.check()?;
        self.io.write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        self.check()?;
        self.io.flush()
    }
}

impl<IO: Transport> Transport for Guarded<IO> {
    #[inline]
    fn close(&mut self) -> Result<()> { self.io.close() }

    #[inline]
    fn set_io_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.io.set_io_timeout(timeout)
    }
}
