//! # Logger Composition
//!
//! [`Logger`] is the composition root of the logging stack: it owns the
//! directory outcome, the sink, the encoder and the level filter, and decides
//! how widely the resulting dispatcher is visible.
//!
//! ## Installation Modes
//!
//! - **Global**: [`Logger::install_global`] publishes the logger to the whole
//!   process. `tracing` accepts exactly one global default, so the first call
//!   installs a dispatcher around a reloadable slot and every later call
//!   replaces the contents of that slot. The previous sink and encoder stop
//!   receiving records as soon as the replacement returns.
//! - **Scoped**: [`Logger::set_default`] and [`Logger::with_default`] install
//!   the logger for the current thread only, which keeps tests and embedded
//!   uses independent of process-wide state.
//!
//! ## Error Policy
//!
//! Building never terminates the process. A missing working directory or an
//! unopenable log file is returned as an error and the caller decides whether
//! that is fatal.

use crate::config::{ColorMode, LoggerConfig};
use crate::directory::{self, DirectoryOutcome};
use crate::encoder::ConsoleEncoder;
use crate::error::LoggerError;
use crate::sink::LogSink;
use parking_lot::Mutex;
use std::env;
use std::path::{Path, PathBuf};
use tracing::dispatcher::{self, DefaultGuard, Dispatch};
use tracing::level_filters::LevelFilter;
use tracing::{debug, warn};
use tracing_subscriber::layer::Layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, Registry};

/// Level filter, encoder and sink as one layer over the registry
pub(crate) type FileLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Handle to the layer behind the process-wide dispatcher, once installed
static GLOBAL: Mutex<Option<reload::Handle<FileLayer, Registry>>> =
    parking_lot::const_mutex(None);

/// A fully wired logger that has not necessarily been installed yet
pub struct Logger {
    dispatch: Dispatch,
    sink: LogSink,
    encoder: ConsoleEncoder,
    min_level: LevelFilter,
    log_dir: PathBuf,
    directory: DirectoryOutcome,
}

impl Logger {
    /// Build the logger described by `config`
    ///
    /// Steps, in order:
    /// 1. Resolve the base directory (working directory unless configured)
    /// 2. Ensure the log directory; problems here are logged, not returned
    /// 3. Open the log file in append mode
    /// 4. Build the encoder and combine it with the sink and minimum level
    pub fn build(config: &LoggerConfig) -> Result<Self, LoggerError> {
        let base = match &config.base_dir {
            Some(dir) => dir.clone(),
            None => env::current_dir().map_err(LoggerError::CurrentDir)?,
        };

        let log_dir = config.log_dir(&base);
        let directory = directory::ensure(&log_dir);

        let path = config.log_file(&base);
        let sink = LogSink::open(&path, config.file_mode)
            .map_err(|source| LoggerError::OpenSink { path, source })?;

        let ansi = match config.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => sink.is_terminal(),
        };
        let encoder = ConsoleEncoder::new(config.encoder.clone(), ansi)
            .with_caller(config.with_caller)
            .with_stacktrace(config.stacktrace_level);

        let mut logger = Self {
            dispatch: Dispatch::none(),
            sink,
            encoder,
            min_level: config.min_level,
            log_dir,
            directory,
        };
        logger.dispatch =
            Dispatch::new(tracing_subscriber::registry().with(logger.file_layer()));
        logger.report_directory();
        Ok(logger)
    }

    /// A fresh layer writing through this logger's sink and encoder
    pub(crate) fn file_layer(&self) -> FileLayer {
        let format = fmt::layer::<Registry>()
            .with_writer(self.sink.clone())
            .event_format(self.encoder.clone());
        Box::new(<LevelFilter as Layer<Registry>>::and_then(
            self.min_level,
            format,
        ))
    }

    fn report_directory(&self) {
        self.with_default(|| {
            let dir = self.log_dir.display();
            match &self.directory {
                DirectoryOutcome::Created => debug!(path = %dir, "created log directory"),
                DirectoryOutcome::AlreadyPresent => {
                    debug!(path = %dir, "using existing log directory")
                }
                DirectoryOutcome::Indeterminate(e) => {
                    warn!(path = %dir, error = %e, "could not inspect log directory")
                }
                DirectoryOutcome::CreateFailed(e) => {
                    warn!(path = %dir, error = %e, "could not create log directory")
                }
            }
        });
    }

    /// Publish this logger as the process-wide default, replacing any earlier one
    ///
    /// Any `tracing` macro in any thread is routed here afterwards. Fails with
    /// [`LoggerError::AlreadyInstalled`] only when a global dispatcher was set
    /// by something other than this crate.
    pub fn install_global(&self) -> Result<(), LoggerError> {
        let mut global = GLOBAL.lock();
        match global.as_ref() {
            Some(handle) => {
                handle
                    .reload(self.file_layer())
                    .map_err(LoggerError::Reload)?;
            }
            None => {
                let (slot, handle) = reload::Layer::new(self.file_layer());
                dispatcher::set_global_default(Dispatch::new(
                    tracing_subscriber::registry().with(slot),
                ))
                .map_err(LoggerError::AlreadyInstalled)?;
                *global = Some(handle);
            }
        }
        drop(global);

        debug!(path = %self.sink.path().display(), "global logger installed");
        Ok(())
    }

    /// Make this logger the default for the current thread until the guard drops
    pub fn set_default(&self) -> DefaultGuard {
        dispatcher::set_default(&self.dispatch)
    }

    /// Run `f` with this logger as the current thread's default
    pub fn with_default<T>(&self, f: impl FnOnce() -> T) -> T {
        dispatcher::with_default(&self.dispatch, f)
    }

    /// Flush the log file to disk
    pub fn sync(&self) -> Result<(), LoggerError> {
        self.sink.sync().map_err(|source| LoggerError::Sync {
            path: self.sink.path().to_path_buf(),
            source,
        })
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn log_file(&self) -> &Path {
        self.sink.path()
    }

    /// What happened to the log directory during [`Logger::build`]
    pub fn directory_outcome(&self) -> &DirectoryOutcome {
        &self.directory
    }
}

/// Initialize the process logger with the default layout and install it globally
///
/// Writes go to `logs/filename.txt` under the current working directory.
/// Calling it again replaces the global logger with a freshly built one.
pub fn init_logger() -> Result<Logger, LoggerError> {
    init_logger_with(&LoggerConfig::default())
}

/// Like [`init_logger`], with an explicit configuration
pub fn init_logger_with(config: &LoggerConfig) -> Result<Logger, LoggerError> {
    let logger = Logger::build(config)?;
    logger.install_global()?;
    Ok(logger)
}
