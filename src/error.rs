use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::dispatcher::SetGlobalDefaultError;
use tracing_subscriber::reload;

/// Errors that can occur while building or installing a [`crate::Logger`]
///
/// Problems with the log directory itself are not errors; they are reported
/// as a [`crate::DirectoryOutcome`] and logged once the logger exists.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The current working directory could not be determined
    #[error("failed to read the current working directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// The log file could not be opened or created
    #[error("failed to open log file {}: {source}", path.display())]
    OpenSink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A process-wide dispatcher was installed by something other than this crate
    #[error("a foreign global logger is already installed: {0}")]
    AlreadyInstalled(#[source] SetGlobalDefaultError),

    /// Swapping the global logger for a new one failed
    #[error("failed to replace the global logger: {0}")]
    Reload(#[source] reload::Error),

    /// Flushing the log file to disk failed
    #[error("failed to sync log file {}: {source}", path.display())]
    Sync {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_sink_message_names_path() {
        let err = LoggerError::OpenSink {
            path: PathBuf::from("/var/empty/logs/filename.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = err.to_string();
        assert!(message.contains("/var/empty/logs/filename.txt"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_current_dir_keeps_source() {
        let err = LoggerError::CurrentDir(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("gone"));
    }
}
