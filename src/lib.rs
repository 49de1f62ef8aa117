//! # Startup Logger Library
//!
//! Process-wide logger initialization on top of `tracing` and `tracing-subscriber`.
//! A single call at startup prepares a file-backed logger and publishes it so that
//! every `tracing` macro in the process is routed to the same sink.
//!
//! ## What Initialization Does
//!
//! 1. Ensures a `logs` directory exists under the working directory
//! 2. Opens `logs/filename.txt` for append-only writes (mode `0644`)
//! 3. Builds a console encoder with UTC timestamps and colorized level labels
//! 4. Composes encoder, sink and a `DEBUG` minimum level into a [`Logger`]
//! 5. Installs the logger as the process-wide default dispatcher
//!
//! ## Architecture Overview
//!
//! - `config`: Logger and encoder configuration with production defaults
//! - `directory`: Three-way probing and creation of the log directory
//! - `sink`: Append-only file sink shared between threads
//! - `encoder`: Line formatting (timestamp, level, caller, message, fields)
//! - `logger`: The composition root and its installation modes
//! - `cli`: Argument parsing for the bundled binary
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use startup_logger::init_logger;
//!
//! fn main() -> anyhow::Result<()> {
//!     let _logger = init_logger()?;
//!     tracing::info!("Starting the server...");
//!     Ok(())
//! }
//! ```
//!
//! Each record becomes one line in the log file:
//!
//! ```text
//! 2021-04-08T18:26:05Z	INFO	src/main.rs:15	Starting the server...
//! ```

/// Command-line interface for the bundled binary
pub mod cli;

/// Logger, encoder and color configuration
///
/// `LoggerConfig::default()` reproduces the fixed startup layout: the `logs`
/// directory under the working directory, `filename.txt`, mode `0644`,
/// `DEBUG` as minimum level and caller annotation enabled.
pub mod config;

/// Log directory probing and creation
pub mod directory;

/// Record encoding
///
/// Renders timestamps in UTC, level names in uppercase with optional ANSI
/// colors, and the caller location of each event.
pub mod encoder;

/// Error types returned by logger initialization
pub mod error;

/// Logger composition and installation
pub mod logger;

/// Append-only file sink
pub mod sink;

pub use config::{ColorMode, EncoderConfig, LoggerConfig};
pub use directory::{DirectoryOutcome, DirectoryStatus};
pub use encoder::{ConsoleEncoder, UtcTimestamp};
pub use error::LoggerError;
pub use logger::{init_logger, init_logger_with, Logger};
pub use sink::LogSink;

/// The current version of the startup logger
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
///
/// These constants describe the on-disk layout and record format used when
/// no explicit configuration is given.
pub mod defaults {
    /// Name of the log directory, relative to the base directory
    pub const LOG_DIR_NAME: &str = "logs";

    /// Name of the log file inside the log directory
    pub const LOG_FILE_NAME: &str = "filename.txt";

    /// Permission bits of a newly created log file (`rw-r--r--`)
    pub const LOG_FILE_MODE: u32 = 0o644;

    /// UTC timestamp pattern, e.g. `2021-04-08T18:26:05Z`
    ///
    /// No sub-second precision; the trailing `Z` is the UTC offset notation.
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    /// Separator between the elements of a console line
    pub const CONSOLE_SEPARATOR: &str = "\t";
}
