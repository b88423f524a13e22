#![deny(missing_docs)]
//! Shared logging utilities for the trending workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! the logger initialisation used by the binary, and a minimal test
//! initializer for the global logger.
//!
//! Every macro accepts an optional `page = key;` prefix which tags the message
//! with the page being harvested:
//!
//! ```
//! engine_logging::engine_info!(page = "kalman_watch3"; "fetched {} bytes", 1024);
//! engine_logging::engine_info!("harvest finished");
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

#[doc(hidden)]
pub use log as __log;

/// Log target used for messages carrying a page key.
pub const PAGE_TARGET: &str = "trending::page";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    (page = $page:expr; $($arg:tt)+) => {{
        $crate::__log::trace!(target: $crate::PAGE_TARGET, "[{}] {}", $page, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::__log::trace!($($arg)+);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    (page = $page:expr; $($arg:tt)+) => {{
        $crate::__log::debug!(target: $crate::PAGE_TARGET, "[{}] {}", $page, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::__log::debug!($($arg)+);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    (page = $page:expr; $($arg:tt)+) => {{
        $crate::__log::info!(target: $crate::PAGE_TARGET, "[{}] {}", $page, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::__log::info!($($arg)+);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    (page = $page:expr; $($arg:tt)+) => {{
        $crate::__log::warn!(target: $crate::PAGE_TARGET, "[{}] {}", $page, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::__log::warn!($($arg)+);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    (page = $page:expr; $($arg:tt)+) => {{
        $crate::__log::error!(target: $crate::PAGE_TARGET, "[{}] {}", $page, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::__log::error!($($arg)+);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the terminal (stderr for warnings and errors, stdout otherwise).
    Terminal,
    /// Write to the given file, truncating it first.
    File(PathBuf),
    /// Write to both the terminal and the given file.
    Both(PathBuf),
}

/// Initializes the global logger.
///
/// A file that cannot be created is reported on stderr and skipped; the
/// terminal logger still runs for `LogDestination::Both`. Calling this twice
/// keeps the first logger.
pub fn initialize(level: LevelFilter, destination: LogDestination) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::Terminal => vec![terminal_logger(level, config)],
        LogDestination::File(path) => match file_logger(level, config, &path) {
            Some(logger) => vec![logger],
            None => return,
        },
        LogDestination::Both(path) => {
            let mut loggers = vec![terminal_logger(level, config.clone())];
            if let Some(logger) = file_logger(level, config, &path) {
                loggers.push(logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<dyn SharedLogger> {
    TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

fn file_logger(level: LevelFilter, config: Config, path: &Path) -> Option<Box<dyn SharedLogger>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file) as Box<dyn SharedLogger>),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn page_prefixed_macros_expand() {
        super::initialize_for_tests();
        let key = "vv_rms";
        engine_debug!(page = key; "probe {}", 1);
        engine_info!(page = key; "done");
        engine_warn!("plain {}", "message");
    }
}
