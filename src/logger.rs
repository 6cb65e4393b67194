//! Injected logger.
//!
//! Every [`Negotiator`](crate::negotiate::Negotiator) and
//! [`FramedConnection`](crate::conn::FramedConnection) logs through the
//! [`Logger`] it was given, instead of the process-wide `log` macros.
//! [`Logger::global`] forwards to whatever logger has been installed
//! with `log::set_logger` (e.g. `env_logger`).

use std::fmt::{self, Arguments};
use std::sync::Arc;

use log::{Level, Log, Metadata, Record};

const TARGET: &str = "wsupgrade";

/// Cheap cloneable handle to a [`log::Log`] implementation.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<dyn Log>,
}

struct Global;

struct Silent;

impl Log for Silent {
    fn enabled(&self, _: &Metadata) -> bool { false }

    fn log(&self, _: &Record) {}

    fn flush(&self) {}
}

impl Log for Global {
    fn enabled(&self, metadata: &Metadata) -> bool { log::logger().enabled(metadata) }

    fn log(&self, record: &Record) {
        if log::max_level() >= record.level() {
            log::logger().log(record)
        }
    }

    fn flush(&self) { log::logger().flush() }
}

impl Logger {
    /// Log through the given implementation.
    pub fn new<L: Log + 'static>(inner: L) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Log through the process logger.
    pub fn global() -> Self { Self::new(Global) }

    /// Discard everything.
    pub fn silent() -> Self { Self::new(Silent) }

    pub fn log(&self, level: Level, args: Arguments) {
        let metadata = Metadata::builder().level(level).target(TARGET).build();
        if !self.inner.enabled(&metadata) {
            return;
        }
        self.inner
            .log(&Record::builder().metadata(metadata).args(args).build());
    }

    #[inline]
    pub fn warn(&self, args: Arguments) { self.log(Level::Warn, args) }

    #[inline]
    pub fn info(&self, args: Arguments) { self.log(Level::Info, args) }

    #[inline]
    pub fn debug(&self, args: Arguments) { self.log(Level::Debug, args) }

    #[inline]
    pub fn trace(&self, args: Arguments) { self.log(Level::Trace, args) }
}

impl Default for Logger {
    fn default() -> Self { Self::global() }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("Logger") }
}
