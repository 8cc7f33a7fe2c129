use std::path::PathBuf;
use thiserror::Error;

use super::config::ConfigError;
use crate::core::batch::BatchError;
use crate::core::comparison::ComparisonError;
use crate::core::dos::DosError;
use crate::core::io::TableError;
use crate::core::sweep::SweepError;
use crate::core::thermo::ThermoError;
use crate::core::triplet::TripletError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Dos(#[from] DosError),

    #[error("Thermodynamics failed: {source}")]
    Thermo {
        #[from]
        source: ThermoError,
    },

    #[error(transparent)]
    Comparison(#[from] ComparisonError),

    #[error(transparent)]
    Triplet(#[from] TripletError),

    #[error("Invalid sweep: {source}")]
    Sweep {
        #[from]
        source: SweepError,
    },

    #[error("Invalid batch job: {source}")]
    Batch {
        #[from]
        source: BatchError,
    },

    #[error("Reference data for '{reference}' not found in {}", dir.display())]
    MissingReference { reference: String, dir: PathBuf },

    #[error("Method '{method}' failed: {source}")]
    Method {
        method: String,
        source: Box<EngineError>,
    },

    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not launch '{command}': {source}")]
    Launch {
        command: String,
        source: std::io::Error,
    },

    #[error("Building the simulator failed with {status}")]
    BuildFailed { status: String },

    #[error("Rendering failed: {0}")]
    Render(String),
}

impl EngineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn in_method(method: &str, source: EngineError) -> Self {
        Self::Method {
            method: method.to_string(),
            source: Box::new(source),
        }
    }
}
