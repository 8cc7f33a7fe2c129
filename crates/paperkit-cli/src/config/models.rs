use std::path::PathBuf;

/// Fully resolved settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub paths: PathSettings,
    pub thermo: ThermoSettings,
    pub simulator: SimulatorSettings,
    pub cluster: ClusterSettings,
    pub sweep: SweepSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathSettings {
    pub data_dir: PathBuf,
    pub figs_dir: PathBuf,
    pub jobs_dir: PathBuf,
    pub project_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThermoSettings {
    pub max_temperature: f64,
    pub temperature_bins: usize,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorSettings {
    pub name: String,
    pub build_command: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSettings {
    pub cores: usize,
    pub submit: bool,
    pub memory_per_particle: u64,
    pub submit_command: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepSettings {
    pub python: String,
    pub melting_program: String,
}
