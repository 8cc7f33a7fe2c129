use crate::core::dos::DensityOfStates;
use crate::core::io::TableWriter;
use crate::core::naming::SystemId;
use crate::core::thermo::{TemperatureGrid, Thermodynamics};
use crate::engine::config::ThermoConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Per-particle curves of one method and their deviation from the reference.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodThermo {
    pub method: String,
    pub values: Thermodynamics,
    pub error: Thermodynamics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThermoReport {
    pub system: SystemId,
    pub reference: String,
    pub reference_values: Thermodynamics,
    pub methods: Vec<MethodThermo>,
    /// Methods whose run files were not found.
    pub skipped: Vec<String>,
    pub tables: Vec<PathBuf>,
}

#[instrument(skip_all, name = "thermo_workflow")]
pub fn run(
    config: &ThermoConfig,
    reporter: &ProgressReporter,
) -> Result<ThermoReport, EngineError> {
    let system = config.system;
    let grid = TemperatureGrid::new(config.max_temperature, config.temperature_bins)?;

    // === Phase 1: Reference ===
    reporter.report(Progress::PhaseStart { name: "Reference" });
    let reference_dos = DensityOfStates::load_run(&config.data_dir, &system.run(&config.reference))?
        .ok_or_else(|| EngineError::MissingReference {
            reference: system.run(&config.reference).stem(),
            dir: config.data_dir.clone(),
        })?;
    let reference_values = Thermodynamics::compute(&reference_dos, &grid)?.per_particle(system.n);
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Methods ===
    reporter.report(Progress::PhaseStart { name: "Methods" });
    let mut methods = Vec::with_capacity(config.methods.len());
    let mut skipped = Vec::new();
    reporter.task(config.methods.len() as u64, |tick| {
        for method in &config.methods {
            match method_thermo(config, &grid, method, &reference_values) {
                Ok(Some(result)) => methods.push(result),
                Ok(None) => {
                    warn!("No data for method '{}', skipping it.", method);
                    skipped.push(method.clone());
                }
                Err(e) => return Err(EngineError::in_method(method, e)),
            }
            tick();
        }
        Ok(())
    })?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Tables ===
    reporter.report(Progress::PhaseStart { name: "Tables" });
    fs::create_dir_all(&config.figs_dir).map_err(|e| EngineError::io(&config.figs_dir, e))?;
    let mut tables = vec![write_table(
        &config.figs_dir,
        &system,
        &config.reference,
        &reference_values,
        None,
    )?];
    for result in &methods {
        tables.push(write_table(
            &config.figs_dir,
            &system,
            &result.method,
            &result.values,
            Some(&result.error),
        )?);
    }
    reporter.report(Progress::PhaseFinish);

    info!(
        "Computed thermodynamics for {} method(s); {} skipped.",
        methods.len(),
        skipped.len()
    );
    Ok(ThermoReport {
        system,
        reference: config.reference.clone(),
        reference_values,
        methods,
        skipped,
        tables,
    })
}

fn method_thermo(
    config: &ThermoConfig,
    grid: &TemperatureGrid,
    method: &str,
    reference: &Thermodynamics,
) -> Result<Option<MethodThermo>, EngineError> {
    let Some(dos) = DensityOfStates::load_run(&config.data_dir, &config.system.run(method))? else {
        return Ok(None);
    };
    let values = Thermodynamics::compute(&dos, grid)?.per_particle(config.system.n);
    let error = values.difference(reference)?;
    Ok(Some(MethodThermo {
        method: method.to_string(),
        values,
        error,
    }))
}

/// `{figure_stem}-{method}-thermo.dat`
pub fn table_path(figs_dir: &Path, system: &SystemId, method: &str) -> PathBuf {
    figs_dir.join(format!("{}-{}-thermo.dat", system.figure_stem(), method))
}

fn write_table(
    figs_dir: &Path,
    system: &SystemId,
    method: &str,
    values: &Thermodynamics,
    error: Option<&Thermodynamics>,
) -> Result<PathBuf, EngineError> {
    let path = table_path(figs_dir, system, method);
    let mut columns: Vec<&[f64]> = vec![
        &values.temperatures,
        &values.internal_energy,
        &values.heat_capacity,
        &values.entropy,
    ];
    let mut header = String::from("T\t U/N\t CV/N\t S/N");
    if let Some(error) = error {
        columns.extend([
            error.internal_energy.as_slice(),
            error.heat_capacity.as_slice(),
            error.entropy.as_slice(),
        ]);
        header.push_str("\t dU/N\t dCV/N\t dS/N");
    }
    TableWriter::new()
        .header(header)
        .write_to_path(&columns, &path)?;
    Ok(path)
}
