use crate::config::{ColorMode, LoggerConfig};
use crate::defaults;
use clap::Parser;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Startup Logger - initialize the process file logger and emit a record
#[derive(Parser, Debug, Clone)]
#[clap(version = crate::VERSION, about, long_about = None)]
pub struct Args {
    /// Message to log once the logger is installed
    #[clap(default_value = "Starting the server...")]
    pub message: String,

    /// Directory that holds the log directory (defaults to the working directory)
    #[clap(short = 'b', long)]
    pub base_dir: Option<PathBuf>,

    /// Name of the log directory
    #[clap(long, default_value = defaults::LOG_DIR_NAME)]
    pub dir_name: String,

    /// Name of the log file inside the log directory
    #[clap(short = 'f', long, default_value = defaults::LOG_FILE_NAME)]
    pub file_name: String,

    /// Minimum level written to the log file
    #[clap(short = 'l', long, default_value = "debug")]
    pub level: LevelFilter,

    /// When to colorize level labels
    #[clap(long, value_enum, default_value_t = ColorMode::Always)]
    pub color: ColorMode,

    /// Do not annotate records with the calling file and line
    #[clap(long, default_value_t = false)]
    pub no_caller: bool,
}

impl Args {
    /// Logger configuration described by these arguments
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            base_dir: self.base_dir.clone(),
            dir_name: self.dir_name.clone(),
            file_name: self.file_name.clone(),
            min_level: self.level,
            color: self.color,
            with_caller: !self.no_caller,
            ..LoggerConfig::default()
        }
    }
}
