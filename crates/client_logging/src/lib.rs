#![deny(missing_docs)]
//! Shared logging utilities for the tailor client workspace.
//!
//! This crate provides the `client_*` logging macros used across the
//! codebase and a minimal test initializer for the global logger.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! client_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! client_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! client_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! client_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! client_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
