//! # Log Directory Handling
//!
//! Probing distinguishes three outcomes instead of folding every metadata
//! error into "exists": the directory is there, it is definitely absent, or
//! its state cannot be determined (permission denied, a regular file in its
//! place, ...). Only the definitely-absent case leads to creation.
//!
//! Nothing in this module fails startup. The outcome is handed back to the
//! caller, which logs it once a logger is available; a directory that is
//! really unusable surfaces as a sink open error right afterwards.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Result of inspecting the log directory path
#[derive(Debug)]
pub enum DirectoryStatus {
    /// A directory exists at the path
    Exists,
    /// Nothing exists at the path
    Missing,
    /// The path could not be classified
    Indeterminate(io::Error),
}

/// What [`ensure`] did
#[derive(Debug)]
pub enum DirectoryOutcome {
    /// The directory was missing and has been created
    Created,
    /// The directory was already there and was left untouched
    AlreadyPresent,
    /// Creation was skipped because the path could not be classified
    Indeterminate(io::Error),
    /// The directory was missing and creating it failed
    CreateFailed(io::Error),
}

impl DirectoryOutcome {
    /// Whether the directory is known to be usable after [`ensure`]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Created | Self::AlreadyPresent)
    }
}

impl fmt::Display for DirectoryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::AlreadyPresent => write!(f, "already present"),
            Self::Indeterminate(e) => write!(f, "state unknown ({})", e),
            Self::CreateFailed(e) => write!(f, "creation failed ({})", e),
        }
    }
}

/// Classify `path` as an existing directory, missing, or indeterminate
pub fn probe(path: &Path) -> DirectoryStatus {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => DirectoryStatus::Exists,
        Ok(_) => DirectoryStatus::Indeterminate(io::Error::new(
            io::ErrorKind::Other,
            format!("{} exists but is not a directory", path.display()),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => DirectoryStatus::Missing,
        Err(e) => DirectoryStatus::Indeterminate(e),
    }
}

/// Create the log directory at `path` if, and only if, it is missing
///
/// The directory is created with default permissions (`0777` filtered by the
/// process umask on Unix). Only the last path component is created, so a
/// missing parent is reported as [`DirectoryOutcome::CreateFailed`].
pub fn ensure(path: &Path) -> DirectoryOutcome {
    match probe(path) {
        DirectoryStatus::Exists => DirectoryOutcome::AlreadyPresent,
        DirectoryStatus::Indeterminate(e) => DirectoryOutcome::Indeterminate(e),
        DirectoryStatus::Missing => match fs::create_dir(path) {
            Ok(()) => DirectoryOutcome::Created,
            // Lost a race with another creator; the directory is there now.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => {
                DirectoryOutcome::AlreadyPresent
            }
            Err(e) => DirectoryOutcome::CreateFailed(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_probe_three_outcomes() {
        let tmp = TempDir::new().unwrap();

        assert!(matches!(probe(tmp.path()), DirectoryStatus::Exists));
        assert!(matches!(
            probe(&tmp.path().join("absent")),
            DirectoryStatus::Missing
        ));

        let file = tmp.path().join("plain");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(probe(&file), DirectoryStatus::Indeterminate(_)));
    }

    #[test]
    fn test_ensure_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let logs = tmp.path().join("logs");

        let outcome = ensure(&logs);
        assert!(matches!(outcome, DirectoryOutcome::Created));
        assert!(outcome.is_ready());
        assert!(logs.is_dir());
    }

    #[test]
    fn test_ensure_leaves_existing_directory() {
        let tmp = TempDir::new().unwrap();
        let logs = tmp.path().join("logs");
        fs::create_dir(&logs).unwrap();
        fs::write(logs.join("keep.txt"), b"old").unwrap();

        let outcome = ensure(&logs);
        assert!(matches!(outcome, DirectoryOutcome::AlreadyPresent));
        assert_eq!(fs::read(logs.join("keep.txt")).unwrap(), b"old");
    }

    #[test]
    fn test_ensure_skips_non_directory() {
        let tmp = TempDir::new().unwrap();
        let logs = tmp.path().join("logs");
        fs::write(&logs, b"not a dir").unwrap();

        let outcome = ensure(&logs);
        assert!(matches!(outcome, DirectoryOutcome::Indeterminate(_)));
        assert!(!outcome.is_ready());
        assert!(logs.is_file());
    }

    #[test]
    fn test_ensure_reports_missing_parent() {
        let tmp = TempDir::new().unwrap();
        let logs = tmp.path().join("no-such-parent").join("logs");

        let outcome = ensure(&logs);
        assert!(matches!(outcome, DirectoryOutcome::CreateFailed(_)));
        assert!(outcome.to_string().starts_with("creation failed"));
    }
}
