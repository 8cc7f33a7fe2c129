use super::dos::{DosError, LnDosFrame};
use super::io::{ColumnFormat, TableError, TableWriter};
use std::path::Path;
use thiserror::Error;

/// Sampling methods compared by default, as suffixes of the run's file base.
pub const DEFAULT_METHODS: [&str; 8] = [
    "-tmmc",
    "-tmi",
    "-tmi2",
    "-tmi3",
    "-toe",
    "-toe2",
    "-toe3",
    "-vanilla_wang_landau",
];

#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error(transparent)]
    Dos(#[from] DosError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("Entropy window [{start}, {end}] does not fit a ln DOS of {len} entries")]
    WindowOutOfRange { start: usize, end: usize, len: usize },
    #[error("Energy {energy} lies outside the entropy window [{start}, {end}]")]
    EnergyOutsideWindow {
        energy: usize,
        start: usize,
        end: usize,
    },
    #[error("Energy {energy} has no round-trip entry (only {len} recorded)")]
    EnergyOutOfRange { energy: usize, len: usize },
    #[error("No frames to compare")]
    NoFrames,
}

/// The energies over which ln DOS estimates are compared: from the maximum
/// entropy state down to the lowest energy that matters, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntropyWindow {
    pub start: usize,
    pub end: usize,
}

impl EntropyWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn slice<'a>(&self, values: &'a [f64]) -> Result<&'a [f64], ComparisonError> {
        if self.is_empty() || self.end >= values.len() {
            return Err(ComparisonError::WindowOutOfRange {
                start: self.start,
                end: self.end,
                len: values.len(),
            });
        }
        Ok(&values[self.start..=self.end])
    }
}

/// Reference ln DOS restricted to its own entropy window.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDos {
    pub window: EntropyWindow,
    window_ln_dos: Vec<f64>,
}

impl ReferenceDos {
    pub fn from_frame(frame: &LnDosFrame) -> Result<Self, ComparisonError> {
        let window = EntropyWindow::new(
            frame.require_max_entropy_state()?,
            frame.require_min_important_energy()?,
        );
        Self::new(&frame.ln_dos, window)
    }

    pub fn new(ln_dos: &[f64], window: EntropyWindow) -> Result<Self, ComparisonError> {
        let window_ln_dos = window.slice(ln_dos)?.to_vec();
        Ok(Self {
            window,
            window_ln_dos,
        })
    }

    pub fn windowed(&self) -> &[f64] {
        &self.window_ln_dos
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Entropy error of one ln DOS estimate relative to the reference.
///
/// The estimate is shifted so that its mean over the window equals the
/// reference mean; what remains is `ΔS(E)`, the log of the error in the
/// predicted histogram.
pub fn entropy_error(
    ln_dos: &[f64],
    reference: &ReferenceDos,
) -> Result<Vec<f64>, ComparisonError> {
    let windowed = reference.window.slice(ln_dos)?;
    let norm_factor = mean(windowed) - mean(reference.windowed());
    Ok(windowed
        .iter()
        .zip(reference.windowed())
        .map(|(s, s_ref)| s - s_ref - norm_factor)
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameErrors {
    pub iterations: u64,
    pub round_trips_at_energy: f64,
    pub error_at_energy: f64,
    /// Mean absolute entropy error over the window.
    pub error_in_entropy: f64,
    /// Spread of the entropy error, independent of how it is normalized.
    pub max_error: f64,
    pub max_entropy_state: Option<usize>,
    pub min_important_energy: Option<usize>,
}

impl FrameErrors {
    pub fn compute(
        frame: &LnDosFrame,
        reference: &ReferenceDos,
        energy: usize,
    ) -> Result<Self, ComparisonError> {
        let window = reference.window;
        if energy < window.start || energy > window.end {
            return Err(ComparisonError::EnergyOutsideWindow {
                energy,
                start: window.start,
                end: window.end,
            });
        }

        let round_trips = frame.round_trips()?;
        let round_trips_at_energy =
            *round_trips
                .get(energy)
                .ok_or(ComparisonError::EnergyOutOfRange {
                    energy,
                    len: round_trips.len(),
                })?;

        let errors = entropy_error(&frame.ln_dos, reference)?;
        let (lo, hi) = errors
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &e| {
                (lo.min(e), hi.max(e))
            });

        Ok(Self {
            iterations: frame.require_iterations()?,
            round_trips_at_energy,
            error_at_energy: errors[energy - window.start],
            error_in_entropy: errors.iter().map(|e| e.abs()).sum::<f64>() / errors.len() as f64,
            max_error: hi - lo,
            max_entropy_state: frame.max_entropy_state,
            min_important_energy: frame.min_important_energy,
        })
    }
}

/// Number of leading frames whose iteration counts strictly increase.
///
/// A movie directory can contain frames from a restarted run; only the
/// first continuous run is meaningful.
pub fn count_increasing_prefix(iterations: &[u64]) -> usize {
    if iterations.is_empty() {
        return 0;
    }
    1 + iterations
        .windows(2)
        .take_while(|pair| pair[1] > pair[0])
        .count()
}

/// Error history of one method across the frames of its movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodHistory {
    pub method: String,
    pub frames: Vec<FrameErrors>,
}

impl MethodHistory {
    /// Builds the history from frames in file order, dropping everything after
    /// the iteration count stops increasing.
    pub fn from_frames(
        method: &str,
        mut frames: Vec<FrameErrors>,
    ) -> Result<Self, ComparisonError> {
        if frames.is_empty() {
            return Err(ComparisonError::NoFrames);
        }
        let iterations: Vec<u64> = frames.iter().map(|f| f.iterations).collect();
        frames.truncate(count_increasing_prefix(&iterations));
        Ok(Self {
            method: method.to_string(),
            frames,
        })
    }

    fn series(&self, f: impl Fn(&FrameErrors) -> f64) -> Vec<f64> {
        self.frames.iter().map(f).collect()
    }

    pub fn iterations(&self) -> Vec<f64> {
        self.series(|f| f.iterations as f64)
    }

    /// `energy-{E}.txt`: round trips and entropy error at the chosen energy.
    pub fn write_energy_table(&self, dir: &Path, energy: usize) -> Result<(), ComparisonError> {
        let round_trips = self.series(|f| f.round_trips_at_energy);
        let error = self.series(|f| f.error_at_energy);
        TableWriter::new()
            .header("round trips\t doserror")
            .write_to_path(
                &[&round_trips, &error],
                &dir.join(format!("energy-{}.txt", energy)),
            )?;
        Ok(())
    }

    /// `errors.txt`: iteration count, mean entropy error and error spread.
    pub fn write_error_table(&self, dir: &Path) -> Result<(), ComparisonError> {
        let iterations = self.iterations();
        let error_in_entropy = self.series(|f| f.error_in_entropy);
        let max_error = self.series(|f| f.max_error);
        TableWriter::new()
            .header("iterations\t errorinentropy\t maxerror")
            .formats(&[
                ColumnFormat::Integer,
                ColumnFormat::General(3),
                ColumnFormat::General(3),
            ])
            .write_to_path(
                &[&iterations, &error_in_entropy, &max_error],
                &dir.join("errors.txt"),
            )?;
        Ok(())
    }
}

/// Method suffix contributed by a `{filebase}-wltmmc…-movie` directory, e.g.
/// `periodic-ww1.30-ff0.30-N50-wltmmc-0.8-movie` gives `-wltmmc-0.8`.
pub fn wltmmc_variant(filebase: &str, dir_name: &str) -> Option<String> {
    let rest = dir_name.strip_prefix(filebase)?.strip_prefix('-')?;
    if !rest.starts_with("wltmmc") || !dir_name.ends_with("-movie") {
        return None;
    }
    let name = rest.split("-m").next().unwrap_or(rest);
    Some(format!("-{}", name))
}
