use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FilePathsConfig {
    #[serde(rename = "data-dir")]
    pub data_dir: Option<PathBuf>,
    #[serde(rename = "figs-dir")]
    pub figs_dir: Option<PathBuf>,
    #[serde(rename = "jobs-dir")]
    pub jobs_dir: Option<PathBuf>,
    #[serde(rename = "project-dir")]
    pub project_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileThermoConfig {
    #[serde(rename = "max-temperature")]
    pub max_temperature: Option<f64>,
    #[serde(rename = "temperature-bins")]
    pub temperature_bins: Option<usize>,
    pub reference: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileSimulatorConfig {
    pub name: Option<String>,
    #[serde(rename = "build-command")]
    pub build_command: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileClusterConfig {
    pub cores: Option<usize>,
    pub submit: Option<bool>,
    #[serde(rename = "memory-per-particle")]
    pub memory_per_particle: Option<u64>,
    #[serde(rename = "submit-command")]
    pub submit_command: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileSweepConfig {
    pub python: Option<String>,
    #[serde(rename = "melting-program")]
    pub melting_program: Option<String>,
}

/// The TOML configuration file. Every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub paths: Option<FilePathsConfig>,
    pub thermo: Option<FileThermoConfig>,
    pub simulator: Option<FileSimulatorConfig>,
    pub cluster: Option<FileClusterConfig>,
    pub sweep: Option<FileSweepConfig>,
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CliError::ConfigNotFound(path.to_path_buf()),
            _ => CliError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let parts: Vec<_> = kv_pair.splitn(2, '=').collect();
            if parts.len() != 2 {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            }
            let key = parts[0];
            let value = parts[1];
            debug!("Applying override {} = {}", key, value);

            match key {
                "paths.data-dir" => {
                    self.paths.get_or_insert_with(Default::default).data_dir =
                        Some(value.into());
                }
                "paths.figs-dir" => {
                    self.paths.get_or_insert_with(Default::default).figs_dir =
                        Some(value.into());
                }
                "paths.jobs-dir" => {
                    self.paths.get_or_insert_with(Default::default).jobs_dir =
                        Some(value.into());
                }
                "paths.project-dir" => {
                    self.paths.get_or_insert_with(Default::default).project_dir =
                        Some(value.into());
                }
                "thermo.max-temperature" => {
                    self.thermo
                        .get_or_insert_with(Default::default)
                        .max_temperature = Some(parse_value(key, value, "float")?);
                }
                "thermo.temperature-bins" => {
                    self.thermo
                        .get_or_insert_with(Default::default)
                        .temperature_bins = Some(parse_value(key, value, "integer")?);
                }
                "thermo.reference" => {
                    self.thermo.get_or_insert_with(Default::default).reference =
                        Some(value.to_string());
                }
                "simulator.name" => {
                    self.simulator.get_or_insert_with(Default::default).name =
                        Some(value.to_string());
                }
                "simulator.build-command" => {
                    self.simulator
                        .get_or_insert_with(Default::default)
                        .build_command = Some(value.to_string());
                }
                "cluster.cores" => {
                    self.cluster.get_or_insert_with(Default::default).cores =
                        Some(parse_value(key, value, "integer")?);
                }
                "cluster.submit" => {
                    self.cluster.get_or_insert_with(Default::default).submit =
                        Some(parse_value(key, value, "boolean")?);
                }
                "cluster.memory-per-particle" => {
                    self.cluster
                        .get_or_insert_with(Default::default)
                        .memory_per_particle = Some(parse_value(key, value, "integer")?);
                }
                "cluster.submit-command" => {
                    self.cluster
                        .get_or_insert_with(Default::default)
                        .submit_command = Some(value.to_string());
                }
                "sweep.python" => {
                    self.sweep.get_or_insert_with(Default::default).python =
                        Some(value.to_string());
                }
                "sweep.melting-program" => {
                    self.sweep
                        .get_or_insert_with(Default::default)
                        .melting_program = Some(value.to_string());
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_kebab_case_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("paperkit.toml");
        fs::write(
            &path,
            r#"
            [paths]
            data-dir = "/scratch/data"

            [cluster]
            cores = 6
            submit = true
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(
            config.paths.unwrap().data_dir,
            Some(PathBuf::from("/scratch/data"))
        );
        let cluster = config.cluster.unwrap();
        assert_eq!(cluster.cores, Some(6));
        assert_eq!(cluster.submit, Some(true));
        assert!(config.thermo.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("paperkit.toml");
        fs::write(&path, "[cluster]\nnodes = 3\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        match FileConfig::from_file(&path) {
            Err(CliError::ConfigNotFound(missing)) => assert_eq!(missing, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn set_values_fill_nested_sections() {
        let mut config = FileConfig::default();
        config
            .apply_set_values(&[
                "thermo.temperature-bins=500".to_string(),
                "cluster.submit=true".to_string(),
                "sweep.python=python3".to_string(),
            ])
            .unwrap();
        assert_eq!(config.thermo.unwrap().temperature_bins, Some(500));
        assert_eq!(config.cluster.unwrap().submit, Some(true));
        assert_eq!(config.sweep.unwrap().python.as_deref(), Some("python3"));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        let mut config = FileConfig::default();
        for bad in ["cluster.cores", "cluster.cores=many", "cluster.nodes=2"] {
            let result = config.apply_set_values(&[bad.to_string()]);
            assert!(matches!(result, Err(CliError::Config(_))), "{}", bad);
        }
    }
}
