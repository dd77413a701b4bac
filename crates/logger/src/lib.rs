//! Lightweight logger crate with feature-gated levels.
//! - `log-info` enables `info!` output (enabled by default).
//! - `log-debug` enables `debug!` output and a runtime debug flag.
//! - `verbose` enables `verbose!` output, a simple printer with no tags.
//! - `file-logging` enables writing log messages to a file (verbose does NOT go to file).
//! - `warn!` and `error!` are always active.
//!
//! Warnings and errors go to stderr; info and debug go to stdout. When a log
//! file is active, tagged messages are written there instead of the console.

use std::fmt::Arguments;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[cfg(feature = "file-logging")]
use std::{
    fs::{File, OpenOptions},
    io::Write,
    sync::{LazyLock, Mutex},
};

/// Logging levels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    /// Error-level messages (always enabled).
    Error = 1,
    /// Warning-level messages (always enabled).
    Warn = 2,
    /// Info-level messages (requires `log-info` feature).
    Info = 3,
    /// Debug-level messages (requires `log-debug` feature and runtime flag).
    Debug = 4,
}

/// Determine the default logging level based on enabled features.
const fn default_level() -> u8 {
    if cfg!(feature = "log-debug") {
        Level::Debug as u8
    } else if cfg!(feature = "log-info") {
        Level::Info as u8
    } else {
        Level::Warn as u8
    }
}

/// Global storage for the current log level.
static LOG_LEVEL: AtomicU8 = AtomicU8::new(default_level());
/// Runtime flag controlling whether `debug!` messages should emit.
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(true);
/// Runtime flag controlling whether `verbose!` output should emit.
static VERBOSE_ENABLED: AtomicBool = AtomicBool::new(false);
/// Handle for the active log file, when file logging has been initialized.
#[cfg(feature = "file-logging")]
static LOG_FILE: LazyLock<Mutex<Option<File>>> = LazyLock::new(|| Mutex::new(None));

/// Set the global log level.
pub fn set_level(level: Level) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Parse and set level from a string (case-insensitive). Returns true on success.
#[must_use]
pub fn set_level_from_str(level: &str) -> bool {
    let parsed = match level.to_ascii_lowercase().as_str() {
        "error" | "err" => Level::Error,
        "warn" | "warning" => Level::Warn,
        "info" => Level::Info,
        "debug" => Level::Debug,
        _ => return false,
    };
    set_level(parsed);
    true
}

/// Enable debug logging at runtime (no-op when `log-debug` is disabled).
pub fn enable_debug() {
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

/// Disable debug logging at runtime.
pub fn disable_debug() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

/// Returns whether debug logging is enabled (false if `log-debug` is disabled).
pub fn is_debug_enabled() -> bool {
    cfg!(feature = "log-debug") && DEBUG_ENABLED.load(Ordering::SeqCst)
}

/// Enable verbose output at runtime (no-op when `verbose` is disabled).
pub fn enable_verbose() {
    VERBOSE_ENABLED.store(true, Ordering::SeqCst);
}

/// Disable verbose output at runtime.
pub fn disable_verbose() {
    VERBOSE_ENABLED.store(false, Ordering::SeqCst);
}

/// Returns whether verbose output is enabled (false if `verbose` is disabled).
pub fn is_verbose_enabled() -> bool {
    cfg!(feature = "verbose") && VERBOSE_ENABLED.load(Ordering::SeqCst)
}

/// Initialize file logging to the specified path.
/// Returns true on success, false on failure.
///
/// # Panics
///
/// Panics if the `LOG_FILE` mutex is poisoned.
#[cfg(feature = "file-logging")]
#[must_use]
pub fn init_file_logging(path: &std::path::Path) -> bool {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .is_ok_and(|file| {
            let mut log_file = LOG_FILE.lock().unwrap();
            *log_file = Some(file);
            true
        })
}

/// Initialize file logging to the specified path.
/// Returns true on success, false on failure.
#[cfg(not(feature = "file-logging"))]
pub fn init_file_logging(_path: &std::path::Path) -> bool {
    false
}

/// Write a tagged message to the log file if one is active.
/// Returns true when the message was consumed by the file sink.
#[cfg(feature = "file-logging")]
fn write_to_file(message: &str) -> bool {
    let Ok(mut log_file) = LOG_FILE.lock() else {
        return false;
    };
    if let Some(ref mut file) = *log_file {
        let _ = writeln!(file, "{message}");
        let _ = file.flush();
        return true;
    }
    false
}

#[cfg(not(feature = "file-logging"))]
fn write_to_file(_message: &str) -> bool {
    false
}

/// Decide whether a message at `level` should be emitted.
///
/// Applies feature gates first (`log-info`, `log-debug`), then compares against
/// the global runtime level. Debug messages additionally require the runtime
/// debug flag.
fn should_log(level: Level) -> bool {
    match level {
        Level::Info if !cfg!(feature = "log-info") => return false,
        Level::Debug if !is_debug_enabled() => return false,
        _ => {}
    }
    (level as u8) <= LOG_LEVEL.load(Ordering::SeqCst)
}

/// Internal logging dispatch used by the public macros.
///
/// Converts `args` to a `String` and emits to the sink configured for
/// `level`. Messages are suppressed when `should_log(level)` is false.
pub fn log_impl(level: Level, args: Arguments) {
    if !should_log(level) {
        return;
    }

    let prefix = match level {
        Level::Error => "[ERROR]",
        Level::Warn => "[WARN]",
        Level::Info => "[INFO]",
        Level::Debug => "[DEBUG]",
    };
    let message = format!("{prefix} {args}");

    if write_to_file(&message) {
        return;
    }

    match level {
        Level::Error | Level::Warn => eprintln!("{message}"),
        Level::Info | Level::Debug => println!("{message}"),
    }
}

#[macro_export]
/// Logs an error-level message (always enabled). Emits to stderr.
macro_rules! error {
    ($($arg:tt)*) => { $crate::log_impl($crate::Level::Error, format_args!($($arg)*)) };
}

#[macro_export]
/// Logs a warning-level message (always enabled). Emits to stderr.
macro_rules! warn {
    ($($arg:tt)*) => { $crate::log_impl($crate::Level::Warn, format_args!($($arg)*)) };
}

#[macro_export]
/// Logs an info-level message (requires `log-info` feature).
macro_rules! info {
    ($($arg:tt)*) => { $crate::log_impl($crate::Level::Info, format_args!($($arg)*)) };
}

#[macro_export]
/// Logs a debug-level message (requires `log-debug` feature and runtime enablement).
macro_rules! debug {
    ($($arg:tt)*) => { $crate::log_impl($crate::Level::Debug, format_args!($($arg)*)) };
}

#[macro_export]
/// Prints a verbose message (requires `verbose` feature and runtime enablement).
/// This is a simple printer with no tags, and does NOT go to log files.
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::is_verbose_enabled() {
            println!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::{disable_debug, enable_debug, set_level, set_level_from_str, Level};

    #[test]
    fn info_no_panic() {
        crate::info!("info {}", 1);
    }

    #[test]
    fn warn_no_panic() {
        crate::warn!("warn {}", 2);
    }

    #[test]
    fn error_no_panic() {
        crate::error!("error {}", 3);
    }

    #[test]
    fn parses_level_strings() {
        assert!(set_level_from_str("ERROR"));
        assert!(set_level_from_str("warning"));
        assert!(set_level_from_str("info"));
        assert!(!set_level_from_str("chatty"));
    }

    #[cfg(feature = "log-debug")]
    #[test]
    fn debug_respects_runtime_flag() {
        set_level(Level::Debug);
        disable_debug();
        crate::debug!("should be silent");
        enable_debug();
        crate::debug!("should emit");
    }
}
