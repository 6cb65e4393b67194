use std::io::{self, ErrorKind};

use super::{ResponseWriter, Hijacked, HijackError, StatusCode};

use crate::error::{Error, HandshakeError};
use crate::handshake::{Request, ErrorResponse, MAX_ALLOW_HEADERS};
use crate::transport::Transport;

/// Response writer over a raw stream, which could be taken over once.
#[derive(Debug)]
pub struct RawResponse<IO> {
    io: Option<IO>,
    buffered: Vec<u8>,
}

impl<IO> RawResponse<IO> {
    /// Wrap a stream whose request head has been consumed.
    /// `buffered` holds the bytes read past the head, if any.
    #[inline]
    pub const fn new(io: IO, buffered: Vec<u8>) -> Self {
        Self {
            io: Some(io),
            buffered,
        }
    }

    /// Bytes read past the request head.
    #[inline]
    pub fn buffered(&self) -> &[u8] { &self.buffered }

    /// Returns `None` once the stream is taken over.
    #[inline]
    pub fn get_ref(&self) -> Option<&IO> { self.io.as_ref() }

    #[inline]
    pub fn into_inner(self) -> Option<IO> { self.io }
}

impl<IO: Transport> ResponseWriter for RawResponse<IO> {
    type Io = IO;

    fn write_error(&mut self, status: StatusCode) -> io::Result<()> {
        let io = match self.io.as_mut() {
            Some(io) => io,
            None => return Err(io::Error::new(ErrorKind::NotConnected, HijackError::Taken)),
        };

        let mut buf = [0u8; 256];
        let n = ErrorResponse::new(status)
            .encode(&mut buf)
            .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e))?;

        io.write_all(&buf[..n])?;
        io.flush()
    }

    fn hijack(&mut self) -> Result<Hijacked<IO>, HijackError> {
        let io = self.io.take().ok_or(HijackError::Taken)?;
        Ok(Hijacked {
            io,
            buffered: std::mem::take(&mut self.buffered),
        })
    }
}

/// Length of the request head, if the buffer holds a complete one.
fn head_len(buf: &[u8]) -> Result<Option<usize>, HandshakeError> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_ALLOW_HEADERS];
    let mut request = httparse::Request::new(&mut headers);
    match request.parse(buf)? {
        httparse::Status::Complete(n) => Ok(Some(n)),
        httparse::Status::Partial => Ok(None),
    }
}

fn reject<IO: Transport>(io: IO, e: HandshakeError) -> Error {
    let mut w = RawResponse::new(io, Vec::new());
    if let Some(status) = e.status() {
        // the client may have gone already
        let _ = w.write_error(status);
    }
    if let Some(mut io) = w.into_inner() {
        let _ = io.close();
    }
    e.into()
}

/// Read an http request head from a raw stream.
///
/// Received data are stored in the provided buffer, and parsed as
/// [`Request`]. This function will block on reading data, until
/// there is enough data to parse a request or an error occurs.
///
/// A malformed request, or one that does not fit in the buffer,
/// is answered with `400 Bad Request` and the stream is closed.
/// Bytes received past the request head are kept by the returned
/// [`RawResponse`], see [`Hijacked::buffered`].
pub fn read_request<'h, 'b: 'h, IO: Transport>(
    mut io: IO,
    buf: &'b mut [u8],
    request: &mut Request<'h, 'b>,
) -> Result<RawResponse<IO>, Error> {
    let total = buf.len();
    let mut offset = 0;

    let head_n = loop {
        // provided buffer is filled, however it could not accommodate the request
        if offset == total {
            return Err(reject(io, HandshakeError::NotEnoughCapacity));
        }

        let n = io.read(&mut buf[offset..])?;

        // EOF, no more data
        if n == 0 {
            return Err(HandshakeError::NotEnoughData.into());
        }

        offset += n;

        match head_len(&buf[..offset]) {
            Ok(Some(n)) => break n,
            Ok(None) => continue,
            Err(e) => return Err(reject(io, e)),
        }
    };

    let buffered = buf[head_n..offset].to_vec();

    let buf: &'b [u8] = buf;
    if let Err(e) = request.decode(&buf[..head_n]) {
        return Err(reject(io, e));
    }

    Ok(RawResponse::new(io, buffered))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::handshake::HttpHeader;
    use crate::transport::test::LimitReadWriter;

    pub const REQUEST: &[u8] = b"\
    GET /ws HTTP/1.1\r\n\
    Host: www.example.com\r\n\
    Upgrade: websocket\r\n\
    Connection: Upgrade\r\n\
    Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
    Sec-WebSocket-Version: 13\r\n\r\n";

    #[test]
    fn recv_upgrade_request() {
        fn run_limit(limit: usize) {
            let mut rw = LimitReadWriter::new(Vec::from(REQUEST), limit, 0);

            let mut buf = vec![0u8; 1024];
            let mut headers = HttpHeader::new_storage();
            let mut request = Request::new(&mut headers);

            let w = read_request(&mut rw, &mut buf, &mut request).unwrap();

            assert!(w.buffered().is_empty());
            assert_eq!(request.method, b"GET");
            assert_eq!(request.path, b"/ws");
            assert_eq!(request.header(b"host"), Some(&b"www.example.com"[..]));
            assert_eq!(
                request.header(b"sec-websocket-key"),
                Some(&b"dGhlIHNhbXBsZSBub25jZQ=="[..])
            );
            drop(w);
            assert_eq!(rw.cursor, REQUEST.len());
        }

        for i in 1..=256 {
            run_limit(i);
        }
    }

    #[test]
    fn recv_with_extra_data() {
        let mut data = Vec::from(REQUEST);
        data.extend_from_slice(b"\x81\x00");
        let mut rw = LimitReadWriter::new(data, 4096, 0);

        let mut buf = vec![0u8; 1024];
        let mut headers = HttpHeader::new_storage();
        let mut request = Request::new(&mut headers);

        let mut w = read_request(&mut rw, &mut buf, &mut request).unwrap();
        assert_eq!(w.buffered(), b"\x81\x00");

        let hijacked = w.hijack().unwrap();
        assert_eq!(hijacked.buffered, b"\x81\x00");
        assert!(matches!(w.hijack(), Err(HijackError::Taken)));
        assert!(w.write_error(StatusCode::BadRequest).is_err());
    }

    #[test]
    fn recv_malformed() {
        let mut rw = LimitReadWriter::new(Vec::from(&b"GET /ws HTTP/1.1\r\nbad header\r\n\r\n"[..]), 4096, 4096);

        let mut buf = vec![0u8; 1024];
        let mut headers = HttpHeader::new_storage();
        let mut request = Request::new(&mut headers);

        let e = read_request(&mut rw, &mut buf, &mut request).unwrap_err();
        assert!(matches!(e, Error::Handshake(HandshakeError::Httparse(_))));
        assert!(rw.wbuf.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
        assert_eq!(rw.closed, 1);
    }

    #[test]
    fn recv_too_large() {
        let mut rw = LimitReadWriter::new(Vec::from(REQUEST), 4096, 4096);

        let mut buf = vec![0u8; 32];
        let mut headers = HttpHeader::new_storage();
        let mut request = Request::new(&mut headers);

        let e = read_request(&mut rw, &mut buf, &mut request).unwrap_err();
        assert!(matches!(e, Error::Handshake(HandshakeError::NotEnoughCapacity)));
        assert!(rw.wbuf.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
    }

    #[test]
    fn recv_eof() {
        let mut rw = LimitReadWriter::new(Vec::from(&REQUEST[..20]), 4096, 4096);

        let mut buf = vec![0u8; 1024];
        let mut headers = HttpHeader::new_storage();
        let mut request = Request::new(&mut headers);

        let e = read_request(&mut rw, &mut buf, &mut request).unwrap_err();
        assert!(matches!(e, Error::Handshake(HandshakeError::NotEnoughData)));
        assert!(rw.wbuf.is_empty());
    }

    #[test]
    fn send_error_response() {
        let mut w = RawResponse::new(LimitReadWriter::new(Vec::new(), 0, 3), Vec::new());
        w.write_error(StatusCode::MethodNotAllowed).unwrap();
        let io = w.into_inner().unwrap();
        assert!(io.wbuf.starts_with(b"HTTP/1.1 405 Method Not Allowed\r\n"));
        assert!(io.wbuf.ends_with(b"\r\n\r\nMethod Not Allowed\n"));
    }
}
