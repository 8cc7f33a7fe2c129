use crate::core::batch::{JobSettings, SquareWellJob};
use crate::core::comparison::DEFAULT_METHODS;
use crate::core::naming::SystemId;
use crate::core::sweep::ValueSpec;
use crate::core::triplet::FieldGeometry;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

fn invalid(parameter: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        parameter,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThermoConfig {
    pub data_dir: PathBuf,
    pub figs_dir: PathBuf,
    pub system: SystemId,
    /// Methods to compare, without the reference.
    pub methods: Vec<String>,
    pub reference: String,
    pub max_temperature: f64,
    pub temperature_bins: usize,
}

#[derive(Default)]
pub struct ThermoConfigBuilder {
    data_dir: Option<PathBuf>,
    figs_dir: Option<PathBuf>,
    system: Option<SystemId>,
    methods: Vec<String>,
    reference: Option<String>,
    max_temperature: Option<f64>,
    temperature_bins: Option<usize>,
}

impl ThermoConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = Some(dir);
        self
    }
    pub fn figs_dir(mut self, dir: PathBuf) -> Self {
        self.figs_dir = Some(dir);
        self
    }
    pub fn system(mut self, system: SystemId) -> Self {
        self.system = Some(system);
        self
    }
    pub fn methods(mut self, methods: Vec<String>) -> Self {
        self.methods = methods;
        self
    }
    pub fn reference(mut self, reference: String) -> Self {
        self.reference = Some(reference);
        self
    }
    pub fn max_temperature(mut self, t: f64) -> Self {
        self.max_temperature = Some(t);
        self
    }
    pub fn temperature_bins(mut self, bins: usize) -> Self {
        self.temperature_bins = Some(bins);
        self
    }

    pub fn build(self) -> Result<ThermoConfig, ConfigError> {
        let reference = self
            .reference
            .ok_or(ConfigError::MissingParameter("reference"))?;
        let methods: Vec<String> = self
            .methods
            .into_iter()
            .filter(|m| *m != reference)
            .collect();
        if methods.is_empty() {
            return Err(invalid("methods", "at least one method besides the reference is needed"));
        }

        let max_temperature = self
            .max_temperature
            .ok_or(ConfigError::MissingParameter("max_temperature"))?;
        if !(max_temperature > 0.0) {
            return Err(invalid("max_temperature", "must be positive"));
        }
        let temperature_bins = self
            .temperature_bins
            .ok_or(ConfigError::MissingParameter("temperature_bins"))?;
        if temperature_bins < 2 {
            return Err(invalid("temperature_bins", "must be at least 2"));
        }

        Ok(ThermoConfig {
            data_dir: self
                .data_dir
                .ok_or(ConfigError::MissingParameter("data_dir"))?,
            figs_dir: self
                .figs_dir
                .ok_or(ConfigError::MissingParameter("figs_dir"))?,
            system: self.system.ok_or(ConfigError::MissingParameter("system"))?,
            methods,
            reference,
            max_temperature,
            temperature_bins,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonConfig {
    pub data_dir: PathBuf,
    /// Energy (row index) at which round trips and the error are tracked.
    pub energy: usize,
    /// Reference ln DOS file, relative to `data_dir`.
    pub reference: String,
    pub filebase: String,
    /// Method suffixes (`-tmmc`, …) before `wltmmc` variants are discovered.
    pub methods: Vec<String>,
}

#[derive(Default)]
pub struct ComparisonConfigBuilder {
    data_dir: Option<PathBuf>,
    energy: Option<usize>,
    reference: Option<String>,
    filebase: Option<String>,
    methods: Option<Vec<String>>,
}

impl ComparisonConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = Some(dir);
        self
    }
    pub fn energy(mut self, energy: usize) -> Self {
        self.energy = Some(energy);
        self
    }
    pub fn reference(mut self, reference: String) -> Self {
        self.reference = Some(reference);
        self
    }
    pub fn filebase(mut self, filebase: String) -> Self {
        self.filebase = Some(filebase);
        self
    }
    pub fn methods(mut self, methods: Vec<String>) -> Self {
        self.methods = Some(methods);
        self
    }

    pub fn build(self) -> Result<ComparisonConfig, ConfigError> {
        let filebase = self
            .filebase
            .ok_or(ConfigError::MissingParameter("filebase"))?;
        if filebase.is_empty() {
            return Err(invalid("filebase", "must not be empty"));
        }
        Ok(ComparisonConfig {
            data_dir: self
                .data_dir
                .ok_or(ConfigError::MissingParameter("data_dir"))?,
            energy: self.energy.ok_or(ConfigError::MissingParameter("energy"))?,
            reference: self
                .reference
                .ok_or(ConfigError::MissingParameter("reference"))?,
            filebase,
            methods: self
                .methods
                .unwrap_or_else(|| DEFAULT_METHODS.iter().map(|m| m.to_string()).collect()),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripletConfig {
    pub figs_dir: PathBuf,
    pub ff: f64,
    pub geometry: FieldGeometry,
}

#[derive(Default)]
pub struct TripletConfigBuilder {
    figs_dir: Option<PathBuf>,
    ff: Option<f64>,
    geometry: Option<FieldGeometry>,
}

impl TripletConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn figs_dir(mut self, dir: PathBuf) -> Self {
        self.figs_dir = Some(dir);
        self
    }
    pub fn ff(mut self, ff: f64) -> Self {
        self.ff = Some(ff);
        self
    }
    pub fn geometry(mut self, geometry: FieldGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn build(self) -> Result<TripletConfig, ConfigError> {
        let ff = self.ff.ok_or(ConfigError::MissingParameter("ff"))?;
        if !(ff > 0.0 && ff < 1.0) {
            return Err(invalid("ff", "filling fraction must lie in (0, 1)"));
        }
        Ok(TripletConfig {
            figs_dir: self
                .figs_dir
                .ok_or(ConfigError::MissingParameter("figs_dir"))?,
            ff,
            geometry: self.geometry.unwrap_or_default(),
        })
    }
}

/// Directory name the melting driver writes into unless told otherwise.
pub const DEFAULT_MELTING_DIR: &str = "crystallization";

#[derive(Debug, Clone, PartialEq)]
pub struct MeltingSweepConfig {
    pub program: String,
    pub workdir: PathBuf,
    pub temperatures: ValueSpec,
    pub densities: ValueSpec,
    pub fv_start: f64,
    pub fv_end: f64,
    pub fv_step: f64,
    pub gw_start: f64,
    /// Gaussian width ends at the lattice constant divided by this.
    pub gw_lattice_end: f64,
    /// Gaussian width steps by the lattice constant divided by this.
    pub gw_lattice_step: f64,
    pub dir: String,
}

pub struct MeltingSweepConfigBuilder {
    program: Option<String>,
    workdir: Option<PathBuf>,
    temperatures: ValueSpec,
    densities: Option<ValueSpec>,
    fv_start: f64,
    fv_end: f64,
    fv_step: f64,
    gw_start: f64,
    gw_lattice_end: f64,
    gw_lattice_step: f64,
    dir: String,
}

impl Default for MeltingSweepConfigBuilder {
    fn default() -> Self {
        Self {
            program: None,
            workdir: None,
            temperatures: ValueSpec::List(vec![2.0]),
            densities: None,
            fv_start: 0.0,
            fv_end: 1.0,
            fv_step: 0.2,
            gw_start: 0.01,
            gw_lattice_end: 2.0,
            gw_lattice_step: 10.0,
            dir: DEFAULT_MELTING_DIR.to_string(),
        }
    }
}

impl MeltingSweepConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(mut self, program: String) -> Self {
        self.program = Some(program);
        self
    }
    pub fn workdir(mut self, dir: PathBuf) -> Self {
        self.workdir = Some(dir);
        self
    }
    pub fn temperatures(mut self, spec: ValueSpec) -> Self {
        self.temperatures = spec;
        self
    }
    pub fn densities(mut self, spec: ValueSpec) -> Self {
        self.densities = Some(spec);
        self
    }
    pub fn fv_start(mut self, start: f64) -> Self {
        self.fv_start = start;
        self
    }
    pub fn fv_end(mut self, end: f64) -> Self {
        self.fv_end = end;
        self
    }
    pub fn fv_step(mut self, step: f64) -> Self {
        self.fv_step = step;
        self
    }
    pub fn gw_start(mut self, start: f64) -> Self {
        self.gw_start = start;
        self
    }
    pub fn gw_lattice_end(mut self, divisor: f64) -> Self {
        self.gw_lattice_end = divisor;
        self
    }
    pub fn gw_lattice_step(mut self, divisor: f64) -> Self {
        self.gw_lattice_step = divisor;
        self
    }
    pub fn dir(mut self, dir: String) -> Self {
        self.dir = dir;
        self
    }

    pub fn build(self) -> Result<MeltingSweepConfig, ConfigError> {
        if !(self.fv_step > 0.0) {
            return Err(invalid("fv_step", "must be positive"));
        }
        if !(self.gw_lattice_end > 0.0) || !(self.gw_lattice_step > 0.0) {
            return Err(invalid("gw_lattice", "lattice divisors must be positive"));
        }
        Ok(MeltingSweepConfig {
            program: self
                .program
                .ok_or(ConfigError::MissingParameter("program"))?,
            workdir: self
                .workdir
                .ok_or(ConfigError::MissingParameter("workdir"))?,
            temperatures: self.temperatures,
            densities: self
                .densities
                .ok_or(ConfigError::MissingParameter("densities"))?,
            fv_start: self.fv_start,
            fv_end: self.fv_end,
            fv_step: self.fv_step,
            gw_start: self.gw_start,
            gw_lattice_end: self.gw_lattice_end,
            gw_lattice_step: self.gw_lattice_step,
            dir: self.dir,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenormalizationConfig {
    pub python: String,
    pub workdir: PathBuf,
    /// RG recursion level `i`; the cell length is `L0 · 2^i`.
    pub level: u32,
    pub ww: f64,
    pub base_length: f64,
    pub counts: Vec<u32>,
    pub overwrite: bool,
}

impl RenormalizationConfig {
    pub fn cell_length(&self) -> f64 {
        self.base_length * 2f64.powi(self.level as i32)
    }
}

#[derive(Default)]
pub struct RenormalizationConfigBuilder {
    python: Option<String>,
    workdir: Option<PathBuf>,
    level: Option<u32>,
    ww: Option<f64>,
    base_length: Option<f64>,
    counts: Option<Vec<u32>>,
    overwrite: bool,
}

impl RenormalizationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn python(mut self, python: String) -> Self {
        self.python = Some(python);
        self
    }
    pub fn workdir(mut self, dir: PathBuf) -> Self {
        self.workdir = Some(dir);
        self
    }
    pub fn level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }
    pub fn ww(mut self, ww: f64) -> Self {
        self.ww = Some(ww);
        self
    }
    pub fn base_length(mut self, length: f64) -> Self {
        self.base_length = Some(length);
        self
    }
    pub fn counts(mut self, counts: Vec<u32>) -> Self {
        self.counts = Some(counts);
        self
    }
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn build(self) -> Result<RenormalizationConfig, ConfigError> {
        let counts = self.counts.ok_or(ConfigError::MissingParameter("counts"))?;
        if counts.is_empty() {
            return Err(invalid("counts", "at least one particle count is needed"));
        }
        let base_length = self
            .base_length
            .ok_or(ConfigError::MissingParameter("base_length"))?;
        if !(base_length > 0.0) {
            return Err(invalid("base_length", "must be positive"));
        }
        Ok(RenormalizationConfig {
            python: self.python.unwrap_or_else(|| "python".to_string()),
            workdir: self
                .workdir
                .ok_or(ConfigError::MissingParameter("workdir"))?,
            level: self.level.ok_or(ConfigError::MissingParameter("level"))?,
            ww: self.ww.ok_or(ConfigError::MissingParameter("ww"))?,
            base_length,
            counts,
            overwrite: self.overwrite,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobConfig {
    pub job: SquareWellJob,
    pub settings: JobSettings,
    pub cores: usize,
    pub build_command: String,
    pub submit: bool,
    pub submit_command: String,
}

#[derive(Default)]
pub struct JobConfigBuilder {
    job: Option<SquareWellJob>,
    jobs_dir: Option<PathBuf>,
    project_dir: Option<PathBuf>,
    simulator: Option<String>,
    memory_per_particle: Option<u64>,
    cores: Option<usize>,
    build_command: Option<String>,
    submit: bool,
    submit_command: Option<String>,
}

impl JobConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job(mut self, job: SquareWellJob) -> Self {
        self.job = Some(job);
        self
    }
    pub fn jobs_dir(mut self, dir: PathBuf) -> Self {
        self.jobs_dir = Some(dir);
        self
    }
    pub fn project_dir(mut self, dir: PathBuf) -> Self {
        self.project_dir = Some(dir);
        self
    }
    pub fn simulator(mut self, name: String) -> Self {
        self.simulator = Some(name);
        self
    }
    pub fn memory_per_particle(mut self, mb: u64) -> Self {
        self.memory_per_particle = Some(mb);
        self
    }
    pub fn cores(mut self, cores: usize) -> Self {
        self.cores = Some(cores);
        self
    }
    pub fn build_command(mut self, command: String) -> Self {
        self.build_command = Some(command);
        self
    }
    pub fn submit(mut self, submit: bool) -> Self {
        self.submit = submit;
        self
    }
    pub fn submit_command(mut self, command: String) -> Self {
        self.submit_command = Some(command);
        self
    }

    pub fn build(self) -> Result<JobConfig, ConfigError> {
        let job = self.job.ok_or(ConfigError::MissingParameter("job"))?;
        if job.values.len() % 2 != 0 {
            return Err(invalid("values", "value parameters must come in name/value pairs"));
        }
        let cores = self.cores.unwrap_or(4);
        if cores == 0 {
            return Err(invalid("cores", "must be at least 1"));
        }
        let settings = JobSettings {
            jobs_dir: self
                .jobs_dir
                .ok_or(ConfigError::MissingParameter("jobs_dir"))?,
            project_dir: self
                .project_dir
                .ok_or(ConfigError::MissingParameter("project_dir"))?,
            simulator: self
                .simulator
                .ok_or(ConfigError::MissingParameter("simulator"))?,
            memory_per_particle: self.memory_per_particle.unwrap_or(20),
        };
        Ok(JobConfig {
            job,
            settings,
            cores,
            build_command: self.build_command.unwrap_or_else(|| "scons".to_string()),
            submit: self.submit,
            submit_command: self.submit_command.unwrap_or_else(|| "sbatch".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thermo_builder() -> ThermoConfigBuilder {
        ThermoConfigBuilder::new()
            .data_dir("data".into())
            .figs_dir("figs".into())
            .system(SystemId::new(1.3, 0.3, 25))
            .reference("tmmc-golden".to_string())
            .max_temperature(1.4)
            .temperature_bins(1000)
    }

    #[test]
    fn thermo_reference_is_removed_from_methods() {
        let config = thermo_builder()
            .methods(vec!["tmmc-golden".to_string(), "nw".to_string()])
            .build()
            .unwrap();
        assert_eq!(config.methods, vec!["nw".to_string()]);
    }

    #[test]
    fn thermo_needs_a_method_to_compare() {
        let result = thermo_builder()
            .methods(vec!["tmmc-golden".to_string()])
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { parameter: "methods", .. })
        ));
    }

    #[test]
    fn missing_parameters_are_named() {
        assert_eq!(
            ComparisonConfigBuilder::new()
                .filebase("base".to_string())
                .build(),
            Err(ConfigError::MissingParameter("data_dir"))
        );
        assert_eq!(
            TripletConfigBuilder::new().figs_dir("figs".into()).build(),
            Err(ConfigError::MissingParameter("ff"))
        );
    }

    #[test]
    fn comparison_defaults_to_standard_methods() {
        let config = ComparisonConfigBuilder::new()
            .data_dir("data".into())
            .energy(3)
            .reference("ref-lndos.dat".to_string())
            .filebase("base".to_string())
            .build()
            .unwrap();
        assert_eq!(config.methods.len(), DEFAULT_METHODS.len());
        assert_eq!(config.methods[0], "-tmmc");
    }

    #[test]
    fn melting_defaults_and_required_densities() {
        assert_eq!(
            MeltingSweepConfigBuilder::new()
                .program("figs/new-melting.mkdat".to_string())
                .workdir(".".into())
                .build(),
            Err(ConfigError::MissingParameter("densities"))
        );

        let config = MeltingSweepConfigBuilder::new()
            .program("figs/new-melting.mkdat".to_string())
            .workdir(".".into())
            .densities(ValueSpec::List(vec![1.0]))
            .build()
            .unwrap();
        assert_eq!(config.temperatures, ValueSpec::List(vec![2.0]));
        assert_eq!(config.dir, DEFAULT_MELTING_DIR);
        assert_eq!(config.gw_lattice_step, 10.0);
    }

    #[test]
    fn renormalization_cell_length_doubles_per_level() {
        let config = RenormalizationConfigBuilder::new()
            .workdir(".".into())
            .level(3)
            .ww(1.3)
            .base_length(5.0)
            .counts(vec![2, 3])
            .build()
            .unwrap();
        assert_eq!(config.cell_length(), 40.0);
        assert_eq!(config.python, "python");
    }

    #[test]
    fn job_config_fills_cluster_defaults() {
        let job = SquareWellJob {
            system: SystemId::new(1.3, 0.3, 10),
            method: "tmmc".to_string(),
            suffix: None,
            values: Vec::new(),
            toggles: Vec::new(),
        };
        let config = JobConfigBuilder::new()
            .job(job)
            .jobs_dir("jobs".into())
            .project_dir("/w".into())
            .simulator("square-well-monte-carlo".to_string())
            .build()
            .unwrap();
        assert_eq!(config.cores, 4);
        assert_eq!(config.settings.memory_per_particle, 20);
        assert_eq!(config.submit_command, "sbatch");
        assert!(!config.submit);
    }
}
