use std::io;

use super::{ResponseWriter, StatusCode, NoTransport};

use crate::handshake::ErrorResponse;

/// Response writer that keeps everything in memory.
///
/// It never supports a takeover, which makes it useful to run the
/// validation steps alone, or to plug the negotiator into an http
/// server that owns its connections.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResponseRecorder {
    pub status: Option<StatusCode>,
    pub data: Vec<u8>,
}

impl ResponseRecorder {
    #[inline]
    pub fn new() -> Self { Self::default() }
}

impl ResponseWriter for ResponseRecorder {
    type Io = NoTransport;

    fn write_error(&mut self, status: StatusCode) -> io::Result<()> {
        let mut buf = [0u8; 256];
        let n = ErrorResponse::new(status)
            .encode(&mut buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        self.status = Some(status);
        self.data.extend_from_slice(&buf[..n]);
        Ok(())
    }
}
