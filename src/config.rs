//! Connection settings.

use std::time::Duration;

/// 16 MiB
pub const DEFAULT_MAX_PAYLOAD_LEN: u64 = 16 * 1024 * 1024;

/// Settings shared by the negotiator and every connection it produces.
///
/// ```
/// use std::time::Duration;
/// use wsupgrade::config::Config;
///
/// let config = Config::new()
///     .max_payload_len(Some(1024))
///     .io_timeout(Some(Duration::from_secs(30)));
/// assert_eq!(config.get_max_payload_len(), Some(1024));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    max_payload_len: Option<u64>,
    reject_reserved_bits: bool,
    io_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self { Self::new() }
}

impl Config {
    /// Default settings: a payload ceiling of [`DEFAULT_MAX_PAYLOAD_LEN`],
    /// reserved bits rejected, no timeout.
    #[inline]
    pub const fn new() -> Self {
        Self {
            max_payload_len: Some(DEFAULT_MAX_PAYLOAD_LEN),
            reject_reserved_bits: true,
            io_timeout: None,
        }
    }

    /// Largest payload a received frame may declare.
    /// `None` trusts the length sent by the peer.
    #[inline]
    pub const fn max_payload_len(mut self, max: Option<u64>) -> Self {
        self.max_payload_len = max;
        self
    }

    /// Fail on frames with any of rsv1, rsv2, rsv3 set.
    /// No extension is ever negotiated, so a compliant peer never sets them.
    #[inline]
    pub const fn reject_reserved_bits(mut self, reject: bool) -> Self {
        self.reject_reserved_bits = reject;
        self
    }

    /// Time allowed for each handshake response, send or receive.
    #[inline]
    pub const fn io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    #[inline]
    pub const fn get_max_payload_len(&self) -> Option<u64> { self.max_payload_len }

    #[inline]
    pub const fn get_reject_reserved_bits(&self) -> bool { self.reject_reserved_bits }

    #[inline]
    pub const fn get_io_timeout(&self) -> Option<Duration> { self.io_timeout }
}
