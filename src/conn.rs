//! Framed websocket connection.
//!
//! A [`FramedConnection`] is handed out by the
//! [`Negotiator`](crate::negotiate::Negotiator) once the handshake
//! succeeds, it can not be built otherwise.
//!
//! ```ignore
//! loop {
//!     let message = match conn.receive() {
//!         Ok(message) => message,
//!         Err(e) if e.is_closed() => break,
//!         Err(e) => return Err(e),
//!     };
//!     conn.send(&message)?;
//! }
//! conn.close()?;
//! ```

use std::io::{self, Write};
use std::time::Instant;

use crate::codec;
use crate::config::Config;
use crate::error::{Error, ClosedBy};
use crate::frame::{OpCode, Mask};
use crate::logger::Logger;
use crate::transport::{Transport, Guarded, CancelToken};

/// Message level access to an upgraded transport.
///
/// A connection is driven by one control flow at a time; every call
/// blocks until it completes or fails. Nothing is retried: once `send`
/// or `receive` fails, the transport is closed and the following
/// calls return [`Error::Closed`].
pub struct FramedConnection<IO: Transport> {
    io: Guarded<IO>,
    write_buf: Vec<u8>,
    mask_key: [u8; 4],
    config: Config,
    logger: Logger,
    closed: bool,
}

impl<IO: Transport> std::fmt::Debug for FramedConnection<IO> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramedConnection")
            .field("mask_key", &self.mask_key)
            .field("config", &self.config)
            .field("closed", &self.closed)
            .finish()
    }
}

impl<IO: Transport> FramedConnection<IO> {
    #[inline]
    pub(crate) fn new(io: Guarded<IO>, config: Config, logger: Logger) -> Self {
        Self {
            io,
            write_buf: Vec::new(),
            mask_key: [0; 4],
            config,
            logger,
            closed: false,
        }
    }

    /// Send the payload as a single text frame.
    pub fn send(&mut self, payload: &[u8]) -> Result<(), Error> {
        if self.closed {
            return Err(Error::Closed(ClosedBy::Local));
        }

        self.write_buf.clear();
        codec::encode_to(&mut self.write_buf, OpCode::Text, Mask::None, payload);

        self.io.arm(self.config.get_io_timeout());
        if let Err(e) = self.io.write_all(&self.write_buf).and_then(|_| self.io.flush()) {
            self.logger.debug(format_args!("send failed: {}", e));
            self.fail();
            return Err(e.into());
        }

        self.logger
            .trace(format_args!("sent frame, payload length: {}", payload.len()));
        Ok(())
    }

    /// Receive the payload of the next text frame.
    ///
    /// A `Close` frame from the peer, or `EOF` between two frames,
    /// is reported as [`Error::Closed`].
    pub fn receive(&mut self) -> Result<Vec<u8>, Error> {
        if self.closed {
            return Err(Error::Closed(ClosedBy::Local));
        }

        self.io.arm(self.config.get_io_timeout());

        match codec::decode(&mut self.io, &self.config) {
            Ok(frame) => {
                self.mask_key = frame.head.mask.key();
                self.logger.debug(format_args!(
                    "read frame, length flag: {}, payload length: {}",
                    frame.head.length.to_flag(),
                    frame.payload.len()
                ));
                Ok(frame.payload)
            }
            Err(Error::Closed(ClosedBy::Peer)) => {
                // transport is shut down by the codec
                self.closed = true;
                self.logger
                    .info(format_args!("received close frame, connection closed"));
                Err(Error::Closed(ClosedBy::Peer))
            }
            Err(e) => {
                // the stream position is lost
                self.logger.debug(format_args!("receive failed: {}", e));
                self.fail();
                Err(e)
            }
        }
    }

    fn fail(&mut self) {
        if let Err(e) = self.close() {
            self.logger.debug(format_args!("close failed: {}", e));
        }
    }

    /// Close the transport. Calling it again, or after any
    /// failure, does nothing.
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.io.close()
    }

    #[inline]
    pub const fn is_closed(&self) -> bool { self.closed }

    /// Mask key of the most recently received frame,
    /// all zero if it was not masked.
    #[inline]
    pub const fn mask_key(&self) -> [u8; 4] { self.mask_key }

    #[inline]
    pub const fn config(&self) -> &Config { &self.config }

    /// Token which aborts the following reads and writes once cancelled.
    #[inline]
    pub fn cancel_token(&self) -> CancelToken { self.io.cancel_token().clone() }

    /// Deadline of all following operations. It is replaced before each
    /// operation if [`Config::io_timeout`] is set.
    #[inline]
    pub fn set_deadline(&mut self, deadline: Option<Instant>) { self.io.set_deadline(deadline) }

    #[inline]
    pub fn get_ref(&self) -> &IO { self.io.get_ref() }
}

impl<IO: Transport> Drop for FramedConnection<IO> {
    fn drop(&mut self) { let _ = self.close(); }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::FrameError;
    use crate::logger::test::Capture;
    use crate::transport::test::LimitReadWriter;

    fn make_conn(rbuf: Vec<u8>, config: Config) -> FramedConnection<LimitReadWriter> {
        FramedConnection::new(
            Guarded::new(LimitReadWriter::new(rbuf, 7, 5)),
            config,
            Logger::silent(),
        )
    }

    fn client_frame(key: [u8; 4], data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        codec::encode_to(&mut buf, OpCode::Text, Mask::Key(key), data);
        buf
    }

    #[test]
    fn echo_hello() {
        let mut conn = make_conn(client_frame([0x11, 0x22, 0x33, 0x44], b"hello"), Config::new());

        let message = conn.receive().unwrap();
        assert_eq!(message, b"hello");
        assert_eq!(conn.mask_key(), [0x11, 0x22, 0x33, 0x44]);

        conn.send(&message).unwrap();
        assert_eq!(conn.get_ref().wbuf, b"\x81\x05hello");
    }

    #[test]
    fn send_reuses_buffer() {
        let mut conn = make_conn(Vec::new(), Config::new());
        let data = vec![b'x'; 70000];

        conn.send(&data).unwrap();
        conn.send(b"ok").unwrap();

        let wbuf = &conn.get_ref().wbuf;
        assert_eq!(wbuf.len(), 10 + 70000 + 2 + 2);
        assert_eq!(&wbuf[wbuf.len() - 4..], b"\x81\x02ok");
    }

    #[test]
    fn receive_until_close() {
        let mut raw = client_frame([1, 2, 3, 4], b"first");
        raw.extend(client_frame([0, 0, 0, 0], b"second"));
        let mut close = Vec::new();
        codec::encode_to(&mut close, OpCode::Close, Mask::Key([5, 6, 7, 8]), b"");
        raw.extend(close);

        let capture = Capture::default();
        let mut conn = FramedConnection::new(
            Guarded::new(LimitReadWriter::new(raw, 3, 3)),
            Config::new(),
            Logger::new(capture.clone()),
        );

        assert_eq!(conn.receive().unwrap(), b"first");
        assert_eq!(conn.mask_key(), [1, 2, 3, 4]);
        assert_eq!(conn.receive().unwrap(), b"second");
        assert_eq!(conn.mask_key(), [0, 0, 0, 0]);

        assert!(matches!(conn.receive(), Err(Error::Closed(ClosedBy::Peer))));
        assert!(conn.is_closed());
        assert_eq!(conn.get_ref().closed, 1);

        // idempotent
        conn.close().unwrap();
        conn.close().unwrap();
        assert_eq!(conn.get_ref().closed, 1);

        assert!(matches!(conn.receive(), Err(Error::Closed(ClosedBy::Local))));
        assert!(matches!(conn.send(b"x"), Err(Error::Closed(ClosedBy::Local))));

        assert!(capture
            .lines()
            .iter()
            .any(|(_, line)| line.contains("received close frame")));
    }

    #[test]
    fn close_after_failure() {
        let mut conn = make_conn(vec![0x01, 0x80, 0, 0, 0, 0], Config::new());

        assert!(matches!(
            conn.receive(),
            Err(Error::Frame(FrameError::Fragmented))
        ));
        assert!(conn.is_closed());
        assert_eq!(conn.get_ref().closed, 1);

        conn.close().unwrap();
        conn.close().unwrap();
        assert_eq!(conn.get_ref().closed, 1);
    }

    // the bytes after a rejected frame head are never parsed as a frame
    #[test]
    fn no_read_after_frame_error() {
        // fragmented head, followed by what looks like an empty text frame
        let mut conn = make_conn(vec![0x01, 0x02, 0x81, 0x00], Config::new());
        assert!(matches!(
            conn.receive(),
            Err(Error::Frame(FrameError::Fragmented))
        ));
        assert!(matches!(conn.receive(), Err(Error::Closed(ClosedBy::Local))));
        assert_eq!(conn.get_ref().cursor, 2);

        // oversized payload, which itself looks like a text frame
        let mut raw = vec![0x81, 0x05];
        raw.extend_from_slice(b"\x81\x03bad");
        let mut conn = make_conn(raw, Config::new().max_payload_len(Some(4)));
        assert!(matches!(
            conn.receive(),
            Err(Error::Frame(FrameError::PayloadTooLarge { len: 5, max: 4 }))
        ));
        assert!(matches!(conn.receive(), Err(Error::Closed(ClosedBy::Local))));
        assert!(matches!(conn.send(b"x"), Err(Error::Closed(ClosedBy::Local))));
        assert!(conn.get_ref().wbuf.is_empty());
        assert_eq!(conn.get_ref().closed, 1);

        // truncated payload
        let mut conn = make_conn(vec![0x81, 0x05, b'a'], Config::new());
        assert!(matches!(conn.receive(), Err(Error::Io(_))));
        assert!(conn.is_closed());
    }

    #[test]
    fn send_failure_closes() {
        let mut conn = make_conn(Vec::new(), Config::new());
        // refuse every write
        conn.io.get_mut().closed = 1;
        assert!(matches!(conn.send(b"x"), Err(Error::Io(_))));
        assert!(conn.is_closed());
        assert!(matches!(conn.send(b"x"), Err(Error::Closed(ClosedBy::Local))));
    }

    #[test]
    fn eof() {
        let mut conn = make_conn(Vec::new(), Config::new());
        let e = conn.receive().unwrap_err();
        assert!(e.is_closed());
        assert!(matches!(e, Error::Closed(ClosedBy::Eof)));
    }

    #[test]
    fn cancelled() {
        let mut conn = make_conn(client_frame([1, 1, 1, 1], b"never"), Config::new());
        conn.cancel_token().cancel();

        match conn.receive() {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionAborted),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(conn.is_closed());
        assert!(matches!(conn.send(b"never"), Err(Error::Closed(ClosedBy::Local))));
        assert!(conn.get_ref().wbuf.is_empty());

        let mut conn = make_conn(Vec::new(), Config::new());
        conn.cancel_token().cancel();
        match conn.send(b"never") {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionAborted),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(conn.get_ref().wbuf.is_empty());
    }

    #[test]
    fn deadline() {
        let mut conn = make_conn(client_frame([1, 1, 1, 1], b"late"), Config::new());
        conn.set_deadline(Some(Instant::now()));

        match conn.receive() {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::TimedOut),
            other => panic!("unexpected: {:?}", other),
        }

        // a configured timeout starts a new deadline for each operation
        let config = Config::new().io_timeout(Some(std::time::Duration::from_secs(30)));
        let mut conn = make_conn(client_frame([1, 1, 1, 1], b"fine"), config);
        conn.set_deadline(Some(Instant::now()));
        assert_eq!(conn.receive().unwrap(), b"fine");
        assert!(conn.get_ref().timeout.is_some());
    }

    #[test]
    fn drop_closes() {
        let mut io = LimitReadWriter::default();
        {
            let _conn = FramedConnection::new(Guarded::new(&mut io), Config::new(), Logger::silent());
        }
        assert_eq!(io.closed, 1);
    }
}
