use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{
    ClusterSettings, PathSettings, Settings, SimulatorSettings, SweepSettings, ThermoSettings,
};
use crate::error::Result;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const LOCAL_CONFIG: &str = "paperkit.toml";

/// The configuration file to read: the explicit path, else `paperkit.toml` in
/// `cwd`, else `config.toml` in the user configuration directory.
pub fn locate_config(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = cwd.join(LOCAL_CONFIG);
    if local.is_file() {
        return Some(local);
    }
    ProjectDirs::from("", "", "paperkit")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .filter(|path| path.is_file())
}

pub fn load_settings(explicit: Option<&Path>, set_values: &[String]) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let file_config = match locate_config(explicit, &cwd) {
        Some(path) => {
            info!("Using configuration file {:?}", path);
            FileConfig::from_file(&path)?
        }
        None => FileConfig::default(),
    };
    build_settings(file_config, set_values)
}

pub fn build_settings(mut file_config: FileConfig, set_values: &[String]) -> Result<Settings> {
    let defaults = DefaultsConfig::default();
    file_config.apply_set_values(set_values)?;

    let paths = file_config.paths.take().unwrap_or_default();
    let thermo = file_config.thermo.take().unwrap_or_default();
    let simulator = file_config.simulator.take().unwrap_or_default();
    let cluster = file_config.cluster.take().unwrap_or_default();
    let sweep = file_config.sweep.take().unwrap_or_default();

    let settings = Settings {
        paths: PathSettings {
            data_dir: paths.data_dir.unwrap_or_else(|| defaults.data_dir.into()),
            figs_dir: paths.figs_dir.unwrap_or_else(|| defaults.figs_dir.into()),
            jobs_dir: paths.jobs_dir.unwrap_or_else(|| defaults.jobs_dir.into()),
            project_dir: paths
                .project_dir
                .unwrap_or_else(|| defaults.project_dir.into()),
        },
        thermo: ThermoSettings {
            max_temperature: thermo.max_temperature.unwrap_or(defaults.max_temperature),
            temperature_bins: thermo.temperature_bins.unwrap_or(defaults.temperature_bins),
            reference: thermo
                .reference
                .unwrap_or_else(|| defaults.reference.to_string()),
        },
        simulator: SimulatorSettings {
            name: simulator
                .name
                .unwrap_or_else(|| defaults.simulator.to_string()),
            build_command: simulator
                .build_command
                .unwrap_or_else(|| defaults.build_command.to_string()),
        },
        cluster: ClusterSettings {
            cores: cluster.cores.unwrap_or(defaults.cores),
            submit: cluster.submit.unwrap_or(defaults.submit),
            memory_per_particle: cluster
                .memory_per_particle
                .unwrap_or(defaults.memory_per_particle),
            submit_command: cluster
                .submit_command
                .unwrap_or_else(|| defaults.submit_command.to_string()),
        },
        sweep: SweepSettings {
            python: sweep.python.unwrap_or_else(|| defaults.python.to_string()),
            melting_program: sweep
                .melting_program
                .unwrap_or_else(|| defaults.melting_program.to_string()),
        },
    };
    debug!("Resolved settings: {:?}", settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_apply_without_a_file() {
        let settings = build_settings(FileConfig::default(), &[]).unwrap();
        assert_eq!(settings.paths.data_dir, PathBuf::from("data"));
        assert_eq!(settings.thermo.max_temperature, 1.4);
        assert_eq!(settings.thermo.temperature_bins, 1000);
        assert_eq!(settings.thermo.reference, "tmmc-golden");
        assert_eq!(settings.simulator.name, "square-well-monte-carlo");
        assert_eq!(settings.cluster.cores, 4);
        assert!(!settings.cluster.submit);
        assert_eq!(settings.sweep.melting_program, "figs/new-melting.mkdat");
    }

    #[test]
    fn set_values_override_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("paperkit.toml");
        fs::write(&path, "[cluster]\ncores = 6\nmemory-per-particle = 30\n").unwrap();

        let file_config = FileConfig::from_file(&path).unwrap();
        let settings = build_settings(file_config, &["cluster.cores=8".to_string()]).unwrap();
        assert_eq!(settings.cluster.cores, 8);
        assert_eq!(settings.cluster.memory_per_particle, 30);
        assert_eq!(settings.cluster.submit_command, "sbatch");
    }

    #[test]
    fn bad_override_stops_resolution() {
        let result = build_settings(FileConfig::default(), &["thermo.bins=3".to_string()]);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn explicit_config_wins_over_local_file() {
        let dir = tempdir().unwrap();
        let local = dir.path().join(LOCAL_CONFIG);
        fs::write(&local, "").unwrap();
        let explicit = dir.path().join("other.toml");

        assert_eq!(
            locate_config(Some(&explicit), dir.path()),
            Some(explicit.clone())
        );
        assert_eq!(locate_config(None, dir.path()), Some(local));
    }
}
