use anyhow::Result;
use chrono::NaiveDateTime;
use startup_logger::{ColorMode, DirectoryOutcome, Logger, LoggerConfig, LoggerError};
use std::fs;
use tempfile::TempDir;

fn plain(base: &std::path::Path) -> LoggerConfig {
    LoggerConfig {
        color: ColorMode::Never,
        ..LoggerConfig::rooted_at(base)
    }
}

/// A missing `logs` directory is created with owner access.
#[test]
fn creates_missing_log_directory() -> Result<()> {
    let tmp = TempDir::new()?;
    let logger = Logger::build(&plain(tmp.path()))?;

    let logs = tmp.path().join("logs");
    assert!(logs.is_dir());
    assert!(matches!(logger.directory_outcome(), DirectoryOutcome::Created));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&logs)?.permissions().mode();
        assert_eq!(mode & 0o700, 0o700);
    }
    Ok(())
}

/// An existing `logs` directory and its contents are left alone.
#[test]
fn keeps_existing_log_directory() -> Result<()> {
    let tmp = TempDir::new()?;
    let logs = tmp.path().join("logs");
    fs::create_dir(&logs)?;
    fs::write(logs.join("previous.txt"), "keep me")?;

    let logger = Logger::build(&plain(tmp.path()))?;

    assert!(matches!(
        logger.directory_outcome(),
        DirectoryOutcome::AlreadyPresent
    ));
    assert_eq!(fs::read_to_string(logs.join("previous.txt"))?, "keep me");
    Ok(())
}

/// An info record carries the level, the message and a UTC timestamp.
#[test]
fn info_record_format() -> Result<()> {
    let tmp = TempDir::new()?;
    let logger = Logger::build(&plain(tmp.path()))?;

    logger.with_default(|| tracing::info!("Starting the server..."));
    logger.sync()?;

    let contents = fs::read_to_string(logger.log_file())?;
    let line = contents
        .lines()
        .find(|l| l.contains("Starting the server..."))
        .expect("record written");

    let fields: Vec<&str> = line.split('\t').collect();
    assert!(NaiveDateTime::parse_from_str(fields[0], "%Y-%m-%dT%H:%M:%SZ").is_ok());
    assert!(fields[0].ends_with('Z'));
    assert_eq!(fields[1], "INFO");
    assert!(fields[2].starts_with("tests/integration_file_sink.rs:"));
    assert_eq!(fields[3], "Starting the server...");
    Ok(())
}

/// Rebuilding against the same file appends instead of truncating.
#[test]
fn consecutive_builds_append() -> Result<()> {
    let tmp = TempDir::new()?;

    let first = Logger::build(&plain(tmp.path()))?;
    first.with_default(|| tracing::info!("first run"));

    let second = Logger::build(&plain(tmp.path()))?;
    second.with_default(|| tracing::info!("second run"));
    second.sync()?;

    let contents = fs::read_to_string(second.log_file())?;
    let first_at = contents.find("first run").expect("first record kept");
    let second_at = contents.find("second run").expect("second record written");
    assert!(first_at < second_at);
    Ok(())
}

/// Scoped installation only affects the current thread.
#[test]
fn scoped_default_is_thread_local() -> Result<()> {
    let tmp = TempDir::new()?;
    let logger = Logger::build(&plain(tmp.path()))?;

    {
        let _guard = logger.set_default();
        tracing::info!("inside scope");
        std::thread::spawn(|| tracing::info!("other thread")).join().unwrap();
    }
    tracing::info!("after scope");

    let contents = fs::read_to_string(logger.log_file())?;
    assert!(contents.contains("inside scope"));
    assert!(!contents.contains("other thread"));
    assert!(!contents.contains("after scope"));
    Ok(())
}

/// A sink that cannot be opened is reported instead of aborting the process.
#[test]
fn unopenable_sink_returns_error() -> Result<()> {
    let tmp = TempDir::new()?;
    fs::write(tmp.path().join("logs"), "a file, not a directory")?;

    match Logger::build(&plain(tmp.path())) {
        Err(LoggerError::OpenSink { path, .. }) => {
            assert_eq!(path, tmp.path().join("logs").join("filename.txt"));
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("build should fail"),
    }
    Ok(())
}

/// Records from many threads stay on separate lines.
#[test]
fn concurrent_records_do_not_interleave() -> Result<()> {
    let tmp = TempDir::new()?;
    let logger = Logger::build(&plain(tmp.path()))?;
    let dispatch = logger.dispatch().clone();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let dispatch = dispatch.clone();
            std::thread::spawn(move || {
                tracing::dispatcher::with_default(&dispatch, || {
                    for i in 0..50 {
                        tracing::info!(worker, i, "tick");
                    }
                })
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.sync()?;

    let contents = fs::read_to_string(logger.log_file())?;
    let ticks: Vec<&str> = contents.lines().filter(|l| l.contains("\ttick\t")).collect();
    assert_eq!(ticks.len(), 200);
    for line in ticks {
        let json = line.rsplit('\t').next().unwrap();
        let value: serde_json::Value = serde_json::from_str(json)?;
        assert!(value["worker"].is_u64() || value["worker"].is_i64());
    }
    Ok(())
}
