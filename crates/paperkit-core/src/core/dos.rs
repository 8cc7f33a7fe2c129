use super::io::{Table, TableError};
use super::naming::RunId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DosError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("'{path}' needs at least {expected} columns, found {found}", path = path.display())]
    MissingColumn {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
    #[error("No log weight recorded for energy level {0}")]
    MissingWeight(i64),
    #[error("'{path}' has no '{key}' entry in its header", path = path.display())]
    MissingMetadata { path: PathBuf, key: &'static str },
}

/// Logarithm of the density of states, one entry per sampled energy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DensityOfStates {
    /// Energies in units of the well depth.
    pub energies: Vec<f64>,
    pub ln_dos: Vec<f64>,
}

impl DensityOfStates {
    pub fn new(energies: Vec<f64>, ln_dos: Vec<f64>) -> Self {
        debug_assert_eq!(energies.len(), ln_dos.len());
        Self { energies, ln_dos }
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Recovers `ln g(E) = ln H(E) - ln w(E)` from a weighted-histogram run.
    ///
    /// `histogram` holds `(level, count)` rows and `log_weights` holds
    /// `(level, ln w)` rows; level `k` is the energy `E = -k`. Levels that were
    /// never visited carry no information and are dropped.
    pub fn from_histogram(histogram: &Table, log_weights: &Table) -> Result<Self, DosError> {
        if histogram.is_empty() {
            return Ok(Self::default());
        }
        let levels = histogram.column(0)?;
        let counts = histogram.column(1)?;

        let weights: HashMap<i64, f64> = log_weights
            .column(0)?
            .into_iter()
            .zip(log_weights.column(1)?)
            .map(|(level, lnw)| (level.round() as i64, lnw))
            .collect();

        let mut energies = Vec::with_capacity(levels.len());
        let mut ln_dos = Vec::with_capacity(levels.len());
        for (level, count) in levels.into_iter().zip(counts) {
            if count <= 0.0 {
                continue;
            }
            let level = level.round() as i64;
            let lnw = weights
                .get(&level)
                .copied()
                .ok_or(DosError::MissingWeight(level))?;
            energies.push(-(level as f64));
            ln_dos.push(count.ln() - lnw);
        }

        Ok(Self { energies, ln_dos })
    }

    /// Loads the `-E.dat`/`-lnw.dat` pair of a run. Returns `Ok(None)` when the
    /// run has not produced both files yet.
    pub fn load_run(dir: &Path, run: &RunId) -> Result<Option<Self>, DosError> {
        let hist_path = run.energy_histogram_path(dir);
        let lnw_path = run.log_weights_path(dir);
        if !hist_path.exists() || !lnw_path.exists() {
            debug!(
                "Run '{}' is missing {:?} or {:?}",
                run.stem(),
                hist_path,
                lnw_path
            );
            return Ok(None);
        }

        let histogram = Table::load(&hist_path)?;
        require_columns(&histogram, &hist_path, 2)?;
        let log_weights = Table::load(&lnw_path)?;
        require_columns(&log_weights, &lnw_path, 2)?;

        Self::from_histogram(&histogram, &log_weights).map(Some)
    }
}

fn require_columns(table: &Table, path: &Path, expected: usize) -> Result<(), DosError> {
    if !table.is_empty() && table.cols() < expected {
        return Err(DosError::MissingColumn {
            path: path.to_path_buf(),
            expected,
            found: table.cols(),
        });
    }
    Ok(())
}

/// One snapshot of an evolving ln DOS estimate, as written into a run's
/// `-movie` directory.
#[derive(Debug, Clone, PartialEq)]
pub struct LnDosFrame {
    pub path: PathBuf,
    pub energies: Vec<f64>,
    pub ln_dos: Vec<f64>,
    round_trips: Option<Vec<f64>>,
    pub iterations: Option<u64>,
    pub max_entropy_state: Option<usize>,
    pub min_important_energy: Option<usize>,
}

impl LnDosFrame {
    pub fn from_table(table: &Table, path: &Path) -> Result<Self, DosError> {
        require_columns(table, path, 2)?;
        let (energies, ln_dos) = if table.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            (table.column(0)?, table.column(1)?)
        };
        let round_trips = if table.cols() >= 3 {
            Some(table.column(2)?)
        } else {
            None
        };

        Ok(Self {
            path: path.to_path_buf(),
            energies,
            ln_dos,
            round_trips,
            iterations: table.metadata_as("iterations")?,
            max_entropy_state: table.metadata_as("max_entropy_state")?,
            min_important_energy: table.metadata_as("min_important_energy")?,
        })
    }

    pub fn load(path: &Path) -> Result<Self, DosError> {
        let table = Table::load(path)?;
        Self::from_table(&table, path)
    }

    pub fn round_trips(&self) -> Result<&[f64], DosError> {
        self.round_trips
            .as_deref()
            .ok_or_else(|| DosError::MissingColumn {
                path: self.path.clone(),
                expected: 3,
                found: 2,
            })
    }

    pub fn require_iterations(&self) -> Result<u64, DosError> {
        self.iterations.ok_or_else(|| self.missing("iterations"))
    }

    pub fn require_max_entropy_state(&self) -> Result<usize, DosError> {
        self.max_entropy_state
            .ok_or_else(|| self.missing("max_entropy_state"))
    }

    pub fn require_min_important_energy(&self) -> Result<usize, DosError> {
        self.min_important_energy
            .ok_or_else(|| self.missing("min_important_energy"))
    }

    fn missing(&self, key: &'static str) -> DosError {
        DosError::MissingMetadata {
            path: self.path.clone(),
            key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::naming::SystemId;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn table(text: &str) -> Table {
        Table::parse(Cursor::new(text)).unwrap()
    }

    #[test]
    fn histogram_and_weights_combine_into_ln_dos() {
        let hist = table("0 10\n1 0\n2 5\n");
        let lnw = table("0 0.5\n1 1.0\n2 -1.0\n");

        let dos = DensityOfStates::from_histogram(&hist, &lnw).unwrap();

        assert_eq!(dos.energies, vec![0.0, -2.0]);
        assert!((dos.ln_dos[0] - (10f64.ln() - 0.5)).abs() < 1e-12);
        assert!((dos.ln_dos[1] - (5f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn missing_weight_is_an_error() {
        let hist = table("0 10\n3 4\n");
        let lnw = table("0 0.0\n");
        assert!(matches!(
            DensityOfStates::from_histogram(&hist, &lnw),
            Err(DosError::MissingWeight(3))
        ));
    }

    #[test]
    fn load_run_returns_none_when_files_are_absent() {
        let dir = tempdir().unwrap();
        let run = SystemId::new(1.3, 0.3, 5).run("tmmc");
        fs::write(run.energy_histogram_path(dir.path()), "0 1\n").unwrap();
        assert!(DensityOfStates::load_run(dir.path(), &run).unwrap().is_none());
    }

    #[test]
    fn load_run_reads_both_files() {
        let dir = tempdir().unwrap();
        let run = SystemId::new(1.3, 0.3, 5).run("tmmc");
        fs::write(run.energy_histogram_path(dir.path()), "0 1\n1 1\n").unwrap();
        fs::write(run.log_weights_path(dir.path()), "0 0\n1 -2\n").unwrap();

        let dos = DensityOfStates::load_run(dir.path(), &run).unwrap().unwrap();
        assert_eq!(dos.len(), 2);
        assert_eq!(dos.ln_dos, vec![0.0, 2.0]);
    }

    #[test]
    fn frame_reads_metadata_and_round_trips() {
        let text = "# iterations: 4000\n# max_entropy_state: 1\n# min_important_energy: 3\n0 1.0 0\n1 2.0 5\n2 3.0 7\n3 4.0 2\n";
        let frame = LnDosFrame::from_table(&table(text), Path::new("f-lndos.dat")).unwrap();

        assert_eq!(frame.iterations, Some(4000));
        assert_eq!(frame.require_max_entropy_state().unwrap(), 1);
        assert_eq!(frame.require_min_important_energy().unwrap(), 3);
        assert_eq!(frame.round_trips().unwrap(), &[0.0, 5.0, 7.0, 2.0]);
    }

    #[test]
    fn frame_without_round_trips_or_metadata_reports_what_is_missing() {
        let frame = LnDosFrame::from_table(&table("0 1.0\n1 2.0\n"), Path::new("g.dat")).unwrap();
        assert!(matches!(
            frame.round_trips(),
            Err(DosError::MissingColumn { expected: 3, .. })
        ));
        assert!(matches!(
            frame.require_iterations(),
            Err(DosError::MissingMetadata { key: "iterations", .. })
        ));
    }
}
