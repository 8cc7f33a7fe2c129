use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing::Subscriber;
use tracing_subscriber::{Layer, filter::LevelFilter, fmt, prelude::*};

/// Terminal verbosity: warnings by default, `-v` per extra level, `-q` for none.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// The log file always keeps launched commands and resolved settings, so it
/// records at least `DEBUG` whatever the terminal shows.
pub fn file_level(terminal: LevelFilter) -> LevelFilter {
    terminal.max(LevelFilter::DEBUG)
}

fn subscriber(terminal: LevelFilter, log_file: Option<File>) -> impl Subscriber + Send + Sync {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(terminal);

    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_filter(file_level(terminal))
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let file = log_file
        .map(|path| {
            File::create(path).map_err(|source| CliError::LogFile {
                path: path.to_path_buf(),
                source,
            })
        })
        .transpose()?;
    subscriber(level_filter(verbosity, quiet), file)
        .try_init()
        .map_err(|e| CliError::Other(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::{debug, info, trace, warn};

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::OFF);
    }

    #[test]
    fn log_file_is_never_quieter_than_debug() {
        assert_eq!(file_level(LevelFilter::OFF), LevelFilter::DEBUG);
        assert_eq!(file_level(LevelFilter::WARN), LevelFilter::DEBUG);
        assert_eq!(file_level(LevelFilter::TRACE), LevelFilter::TRACE);
    }

    #[test]
    #[serial]
    fn quiet_runs_still_log_commands_to_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("paperkit.log");
        let file = File::create(&log_path).unwrap();

        tracing::subscriber::with_default(subscriber(LevelFilter::OFF, Some(file)), || {
            info!("figs/new-melting.mkdat --kT 2 --rd 0.9");
            debug!("Wrote batch script for periodic-ww1.30-ff0.30-N10-tmmc");
            trace!("table row 17");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("--kT 2 --rd 0.9"));
        assert!(content.contains("DEBUG"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains("table row 17"));
        assert!(!content.contains('\u{1b}'));
    }

    #[test]
    #[serial]
    fn terminal_only_subscriber_accepts_events() {
        tracing::subscriber::with_default(subscriber(LevelFilter::INFO, None), || {
            warn!("method skipped");
            info!("running command");
        });
    }

    #[test]
    #[serial]
    fn unwritable_log_file_names_the_path() {
        let result = setup_logging(0, false, Some(Path::new("/")));
        assert!(matches!(result, Err(CliError::LogFile { path, .. }) if path == Path::new("/")));
    }
}
