use crate::defaults;
use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::Level;

/// When to wrap level labels in ANSI color codes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always emit color codes, even into a regular file
    #[default]
    Always,
    /// Never emit color codes
    Never,
    /// Emit color codes only when the sink is a terminal
    Auto,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Always => write!(f, "always"),
            ColorMode::Never => write!(f, "never"),
            ColorMode::Auto => write!(f, "auto"),
        }
    }
}

/// Field naming and layout rules for encoded records
///
/// The key names follow the production naming scheme. The console layout
/// prints elements positionally rather than as `key=value`, so a key only
/// decides whether its element is emitted: an empty key omits the element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    pub message_key: String,
    pub level_key: String,
    pub time_key: String,
    pub caller_key: String,
    /// Key of the stack trace, printed on its own lines after the record
    pub stacktrace_key: String,
    /// Key of the logger name, rendered from the enclosing span names
    pub name_key: String,
    /// Separator between console elements
    pub separator: String,
    pub line_ending: String,
    /// `chrono` format string applied to the UTC timestamp
    pub timestamp_format: String,
}

impl EncoderConfig {
    /// Production field names with the UTC timestamp override
    pub fn production() -> Self {
        Self {
            message_key: "msg".to_string(),
            level_key: "level".to_string(),
            time_key: "ts".to_string(),
            caller_key: "caller".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            name_key: "logger".to_string(),
            separator: defaults::CONSOLE_SEPARATOR.to_string(),
            line_ending: "\n".to_string(),
            timestamp_format: defaults::TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::production()
    }
}

/// Complete logger configuration
///
/// `base_dir` of `None` means the current working directory, resolved at
/// build time.
#[derive(Clone, Debug)]
pub struct LoggerConfig {
    pub base_dir: Option<PathBuf>,
    pub dir_name: String,
    pub file_name: String,
    /// Unix permission bits for a newly created log file
    pub file_mode: u32,
    pub min_level: LevelFilter,
    pub color: ColorMode,
    /// Annotate each record with the file and line of the call site
    pub with_caller: bool,
    /// Attach a stack trace to records at this level or more severe
    pub stacktrace_level: Option<Level>,
    pub encoder: EncoderConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            dir_name: defaults::LOG_DIR_NAME.to_string(),
            file_name: defaults::LOG_FILE_NAME.to_string(),
            file_mode: defaults::LOG_FILE_MODE,
            min_level: LevelFilter::DEBUG,
            color: ColorMode::default(),
            with_caller: true,
            stacktrace_level: None,
            encoder: EncoderConfig::production(),
        }
    }
}

impl LoggerConfig {
    /// Default configuration rooted at `base_dir` instead of the working directory
    pub fn rooted_at(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            ..Self::default()
        }
    }

    /// The log directory below `base`
    pub fn log_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.dir_name)
    }

    /// The log file below `base`
    pub fn log_file(&self, base: &Path) -> PathBuf {
        self.log_dir(base).join(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = LoggerConfig::default();
        let base = Path::new("/srv/app");

        assert!(config.base_dir.is_none());
        assert_eq!(config.log_dir(base), PathBuf::from("/srv/app/logs"));
        assert_eq!(
            config.log_file(base),
            PathBuf::from("/srv/app/logs/filename.txt")
        );
        assert_eq!(config.file_mode, 0o644);
        assert_eq!(config.min_level, LevelFilter::DEBUG);
        assert!(config.with_caller);
        assert!(config.stacktrace_level.is_none());
    }

    #[test]
    fn test_rooted_at_keeps_other_defaults() {
        let config = LoggerConfig::rooted_at("/tmp/x");
        assert_eq!(config.base_dir, Some(PathBuf::from("/tmp/x")));
        assert_eq!(config.file_name, "filename.txt");
        assert_eq!(config.encoder, EncoderConfig::production());
    }

    #[test]
    fn test_production_keys() {
        let encoder = EncoderConfig::production();
        assert_eq!(encoder.message_key, "msg");
        assert_eq!(encoder.level_key, "level");
        assert_eq!(encoder.time_key, "ts");
        assert_eq!(encoder.caller_key, "caller");
        assert_eq!(encoder.stacktrace_key, "stacktrace");
        assert_eq!(encoder.name_key, "logger");
        assert_eq!(encoder.separator, "\t");
        assert_eq!(encoder.timestamp_format, "%Y-%m-%dT%H:%M:%SZ");
    }

    #[test]
    fn test_color_mode_display() {
        assert_eq!(ColorMode::Always.to_string(), "always");
        assert_eq!(ColorMode::Never.to_string(), "never");
        assert_eq!(ColorMode::Auto.to_string(), "auto");
    }
}
