//! Http to websocket upgrade.
//!
//! From [RFC-6455 Section 4.2.1](https://datatracker.ietf.org/doc/html/rfc6455#section-4.2.1),
//! the server checks the opening handshake in this order:
//!
//! 1. the method is `GET`
//! 2. `Sec-WebSocket-Version` is `13`
//! 3. `Connection` contains the token `upgrade`
//! 4. `Upgrade` contains the token `websocket`
//! 5. `Sec-WebSocket-Key` is present
//!
//! Then the transport is taken over from the http layer, and the
//! `101 Switching Protocols` response is sent on it.

use std::io::Write;

use crate::config::Config;
use crate::conn::FramedConnection;
use crate::error::{Error, HandshakeError};
use crate::handshake::{Request, Response, HTTP_METHOD, derive_accept_key};
use crate::handshake::response::MAX_RESPONSE_LEN;
use crate::handshake::static_headers::*;
use crate::http::{ResponseWriter, HijackError, StatusCode};
use crate::logger::Logger;
use crate::transport::{Transport, Guarded};

/// Performs the server handshake, and hands out framed connections.
#[derive(Debug, Clone, Default)]
pub struct Negotiator {
    config: Config,
    logger: Logger,
}

/// Upgrade with the default [`Config`], logging to the process logger.
#[inline]
pub fn negotiate<W: ResponseWriter>(
    request: &Request,
    w: &mut W,
) -> Result<FramedConnection<W::Io>, Error> {
    Negotiator::default().negotiate(request, w)
}

impl Negotiator {
    #[inline]
    pub fn new(config: Config, logger: Logger) -> Self { Self { config, logger } }

    #[inline]
    pub const fn config(&self) -> &Config { &self.config }

    /// Check the upgrade request, take the transport over and
    /// answer with `101 Switching Protocols`.
    ///
    /// A request that does not pass the checks is answered with an
    /// http error through `w`, no transport is taken over.
    /// Once taken over, the transport is closed on any failure.
    pub fn negotiate<W: ResponseWriter>(
        &self,
        request: &Request,
        w: &mut W,
    ) -> Result<FramedConnection<W::Io>, Error> {
        let sec_key = self.check(request).map_err(|e| self.reject(w, e))?;

        // encode before the takeover, nothing is left to close on failure
        let sec_accept = derive_accept_key(sec_key);
        let mut buf = [0u8; MAX_RESPONSE_LEN];
        let n = match Response::new(&sec_accept).encode(&mut buf) {
            Ok(n) => n,
            Err(e) => {
                self.logger
                    .warn(format_args!("websocket: failed to encode response: {}", e));
                let _ = w.write_error(StatusCode::InternalServerError);
                return Err(e.into());
            }
        };

        let hijacked = match w.hijack() {
            Ok(x) => x,
            Err(HijackError::Io(e)) => {
                self.logger
                    .warn(format_args!("websocket: transport takeover failed: {}", e));
                let _ = w.write_error(StatusCode::InternalServerError);
                return Err(e.into());
            }
            Err(_) => return Err(self.reject(w, HandshakeError::Hijack)),
        };

        let mut io = Guarded::new(hijacked.io);

        if !hijacked.buffered.is_empty() {
            let _ = io.close();
            let e = HandshakeError::PreHandshakeData(hijacked.buffered.len());
            self.logger.debug(format_args!("websocket: {}", e));
            return Err(e.into());
        }

        io.arm(self.config.get_io_timeout());
        if let Err(e) = io.write_all(&buf[..n]).and_then(|_| io.flush()) {
            let _ = io.close();
            self.logger
                .debug(format_args!("websocket: failed to send response: {}", e));
            return Err(e.into());
        }

        self.logger.info(format_args!(
            "upgrade http to websocket successfully, path: {}",
            String::from_utf8_lossy(request.path)
        ));

        Ok(FramedConnection::new(io, self.config, self.logger.clone()))
    }

    /// Run the validation steps, return the challenge key.
    fn check<'b>(&self, request: &Request<'_, 'b>) -> Result<&'b [u8], HandshakeError> {
        if request.method != HTTP_METHOD {
            return Err(HandshakeError::HttpMethod);
        }

        if request.header(HEADER_SEC_WEBSOCKET_VERSION_NAME)
            != Some(HEADER_SEC_WEBSOCKET_VERSION_VALUE)
        {
            return Err(HandshakeError::SecWebSocketVersion);
        }

        // header value here is case insensitive
        // ref: https://datatracker.ietf.org/doc/html/rfc6455#section-4.1
        if !request.has_token(HEADER_CONNECTION_NAME, HEADER_CONNECTION_TOKEN) {
            return Err(HandshakeError::Connection);
        }

        if !request.has_token(HEADER_UPGRADE_NAME, HEADER_UPGRADE_VALUE) {
            return Err(HandshakeError::Upgrade);
        }

        match request.header(HEADER_SEC_WEBSOCKET_KEY_NAME) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(HandshakeError::SecWebSocketKey),
        }
    }

    fn reject<W: ResponseWriter>(&self, w: &mut W, e: HandshakeError) -> Error {
        self.logger.debug(format_args!("websocket: {}", e));
        if let Some(status) = e.status() {
            if let Err(e) = w.write_error(status) {
                self.logger
                    .debug(format_args!("websocket: failed to send {}: {}", status, e));
            }
        }
        e.into()
    }
}
