//! Bridge from the `log` facade to a logger supplied by the host app.
//!
//! Register once at launch with [`set_logger`]; adjust verbosity at any time
//! with [`set_log_level`]. Until a logger is registered, records from this
//! library are discarded.
//!
//! ## Swift
//!
//! ```swift
//! final class ChatkitLog: Chatkit.Logger {
//!     func log(level: Chatkit.LogLevel, message: String) {
//!         os_log("%{public}@", log: .default, type: level.osLogType, message)
//!     }
//! }
//!
//! Chatkit.setLogger(logger: ChatkitLog())
//! Chatkit.setLogLevel(level: .info)
//! ```

use std::sync::{Arc, OnceLock};

/// Receives log messages emitted by this library.
///
/// ```rust
/// use chatkit_core::logger::{Logger, LogLevel};
///
/// struct Stderr;
///
/// impl Logger for Stderr {
///     fn log(&self, level: LogLevel, message: String) {
///         eprintln!("{level:?} {message}");
///     }
/// }
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Handles one message.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a log message, most verbose first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Per-operation detail.
    Trace,
    /// Rehydration and storage queue activity.
    Debug,
    /// Session changes such as login and logout.
    Info,
    /// Storage failures that were dropped.
    Warn,
    /// The library could not start a component.
    Error,
}

impl LogLevel {
    const fn from_level(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }

    const fn as_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

static HOST_LOGGER: OnceLock<Arc<dyn Logger>> = OnceLock::new();

struct HostBridge;

impl log::Log for HostBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        // Other crates only get through at info and above.
        metadata.level() <= log::max_level()
            && (metadata.level() <= log::Level::Info || metadata.target().starts_with("chatkit"))
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(logger) = HOST_LOGGER.get() {
            logger.log(LogLevel::from_level(record.level()), record.args().to_string());
        }
    }

    fn flush(&self) {}
}

/// Registers the host logger. Only the first call takes effect.
///
/// The initial level is [`LogLevel::Info`].
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    static BRIDGE: HostBridge = HostBridge;

    if HOST_LOGGER.set(logger).is_err() {
        log::warn!("host logger already registered, ignoring");
        return;
    }
    match log::set_logger(&BRIDGE) {
        Ok(()) => log::set_max_level(LogLevel::Info.as_filter()),
        Err(e) => eprintln!("chatkit: another `log` backend is installed: {e}"),
    }
}

/// Sets the most verbose level forwarded to the host logger.
#[uniffi::export]
pub fn set_log_level(level: LogLevel) {
    log::set_max_level(level.as_filter());
}
