use paperkit::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file '{}' does not exist", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Cannot open log file '{}': {source}", path.display())]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Some sweep points exited non-zero; the rest of the sweep still ran.
    #[error("{failed} of {launched} sweep command(s) failed")]
    SweepFailed { failed: usize, launched: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
