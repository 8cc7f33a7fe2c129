use super::naming::{RunId, SystemId, job_name};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BatchError {
    #[error("Value parameters must come in name/value pairs, got {0} entries")]
    UnpairedValues(usize),
}

/// One command-line argument of a batch job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobArg {
    Value { key: String, value: String },
    Flag(String),
}

/// A SLURM batch script running one simulator invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub job_name: String,
    pub memory_mb: u64,
    pub output: PathBuf,
    pub error: PathBuf,
    pub workdir: PathBuf,
    pub command: PathBuf,
    pub args: Vec<JobArg>,
}

impl BatchJob {
    pub fn script_path(&self, jobs_dir: &Path) -> PathBuf {
        jobs_dir.join(format!("{}.sh", self.job_name))
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BatchJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#!/bin/bash")?;
        writeln!(f, "#SBATCH --mem-per-cpu={}", self.memory_mb)?;
        writeln!(f, "#SBATCH --output {}", self.output.display())?;
        writeln!(f, "#SBATCH --error {}\n", self.error.display())?;
        writeln!(
            f,
            "echo \"Starting job with ID: {}, Estimated memory use: {} MB.\"\n",
            self.job_name, self.memory_mb
        )?;
        writeln!(f, "cd {}", self.workdir.display())?;
        write!(f, "time {}", self.command.display())?;
        for arg in &self.args {
            match arg {
                JobArg::Value { key, value } => write!(f, " \\\n --{} {}", key, value)?,
                JobArg::Flag(flag) => write!(f, " \\\n --{}", flag)?,
            }
        }
        writeln!(f)
    }
}

/// Where scripts go and how the simulator is found.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSettings {
    pub jobs_dir: PathBuf,
    pub project_dir: PathBuf,
    pub simulator: String,
    pub memory_per_particle: u64,
}

/// A square-well Monte-Carlo run to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareWellJob {
    pub system: SystemId,
    pub method: String,
    pub suffix: Option<String>,
    /// Flattened `name, value, name, value, …` pairs.
    pub values: Vec<String>,
    pub toggles: Vec<String>,
}

impl SquareWellJob {
    pub fn run_id(&self) -> RunId {
        self.system.run(&self.method)
    }

    pub fn job_name(&self) -> String {
        job_name(&self.run_id(), &self.toggles, self.suffix.as_deref())
    }

    pub fn build(&self, settings: &JobSettings) -> Result<BatchJob, BatchError> {
        if self.values.len() % 2 != 0 {
            return Err(BatchError::UnpairedValues(self.values.len()));
        }
        let name = self.job_name();

        let mut args = vec![
            value("ww", format!("{:?}", self.system.ww)),
            value("ff", format!("{:?}", self.system.ff)),
            value("N", self.system.n.to_string()),
            // Fixed-temperature methods are spelled `kT0.5` in names but take
            // the temperature as a separate argument.
            JobArg::Flag(self.method.replace("kT", "kT ")),
        ];
        if let Some(suffix) = &self.suffix {
            args.push(value("filename_suffix", suffix.clone()));
        }
        args.extend(
            self.values
                .chunks_exact(2)
                .map(|pair| value(&pair[0], pair[1].clone())),
        );
        args.extend(self.toggles.iter().cloned().map(JobArg::Flag));

        Ok(BatchJob {
            memory_mb: settings.memory_per_particle * u64::from(self.system.n),
            output: settings.jobs_dir.join(format!("{}.out", name)),
            error: settings.jobs_dir.join(format!("{}.err", name)),
            workdir: settings.project_dir.clone(),
            command: settings.project_dir.join(&settings.simulator),
            job_name: name,
            args,
        })
    }
}

fn value(key: &str, value: String) -> JobArg {
    JobArg::Value {
        key: key.to_string(),
        value,
    }
}
