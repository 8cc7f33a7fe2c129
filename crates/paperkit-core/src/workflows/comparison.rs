use crate::core::comparison::{FrameErrors, MethodHistory, ReferenceDos, wltmmc_variant};
use crate::core::dos::LnDosFrame;
use crate::engine::config::ComparisonConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub methods: Vec<String>,
    pub histories: Vec<MethodHistory>,
    pub output_dirs: Vec<PathBuf>,
}

#[instrument(skip_all, name = "comparison_workflow")]
pub fn run(
    config: &ComparisonConfig,
    reporter: &ProgressReporter,
) -> Result<ComparisonReport, EngineError> {
    // === Phase 1: Reference and method discovery ===
    reporter.report(Progress::PhaseStart { name: "Reference" });
    let reference_path = config.data_dir.join(&config.reference);
    let reference = ReferenceDos::from_frame(&LnDosFrame::load(&reference_path)?)?;
    debug!(
        "Reference window [{}, {}] from {:?}",
        reference.window.start, reference.window.end, reference_path
    );

    let mut methods = config.methods.clone();
    for variant in discover_wltmmc_variants(&config.data_dir, &config.filebase)? {
        if !methods.contains(&variant) {
            methods.push(variant);
        }
    }
    info!("Comparing methods: {:?}", methods);
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Per-method error histories ===
    reporter.report(Progress::PhaseStart { name: "Comparison" });
    let mut histories = Vec::new();
    let mut output_dirs = Vec::new();
    reporter.task(methods.len() as u64, |tick| {
        for method in &methods {
            match compare_method(config, &reference, method) {
                Ok(Some((history, dir))) => {
                    histories.push(history);
                    output_dirs.push(dir);
                }
                Ok(None) => debug!("No frames for method '{}'", method),
                Err(e) => {
                    error!("Comparison of method '{}' failed: {}", method, e);
                    return Err(EngineError::in_method(method, e));
                }
            }
            tick();
        }
        Ok(())
    })?;
    reporter.report(Progress::PhaseFinish);

    info!("Wrote error tables for {} method(s).", histories.len());
    Ok(ComparisonReport {
        methods,
        histories,
        output_dirs,
    })
}

/// `{filebase}-wltmmc…-movie` directories next to the regular runs.
fn discover_wltmmc_variants(data_dir: &Path, filebase: &str) -> Result<Vec<String>, EngineError> {
    let mut variants: Vec<String> = fs::read_dir(data_dir)
        .map_err(|e| EngineError::io(data_dir, e))?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| wltmmc_variant(filebase, &entry.file_name().to_string_lossy()))
        .collect();
    variants.sort();
    variants.dedup();
    Ok(variants)
}

fn movie_frames(
    data_dir: &Path,
    filebase: &str,
    method: &str,
) -> Result<Vec<PathBuf>, EngineError> {
    let movie = data_dir.join(format!("{}{}-movie", filebase, method));
    if !movie.is_dir() {
        return Ok(Vec::new());
    }
    let mut frames: Vec<PathBuf> = fs::read_dir(&movie)
        .map_err(|e| EngineError::io(&movie, e))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with("lndos.dat"))
        })
        .collect();
    frames.sort();
    Ok(frames)
}

fn compare_method(
    config: &ComparisonConfig,
    reference: &ReferenceDos,
    method: &str,
) -> Result<Option<(MethodHistory, PathBuf)>, EngineError> {
    let frames = movie_frames(&config.data_dir, &config.filebase, method)?;
    if frames.is_empty() {
        return Ok(None);
    }

    #[cfg(not(feature = "parallel"))]
    let iterator = frames.iter();

    #[cfg(feature = "parallel")]
    let iterator = frames.par_iter();

    let errors = iterator
        .map(|path| -> Result<FrameErrors, EngineError> {
            let frame = LnDosFrame::load(path)?;
            Ok(FrameErrors::compute(&frame, reference, config.energy)?)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let history = MethodHistory::from_frames(method, errors)?;
    let dir = config
        .data_dir
        .join("comparison")
        .join(format!("{}{}", config.filebase, method));
    fs::create_dir_all(&dir).map_err(|e| EngineError::io(&dir, e))?;
    history.write_energy_table(&dir, config.energy)?;
    history.write_error_table(&dir)?;
    Ok(Some((history, dir)))
}
