use crate::core::batch::JobSettings;
use crate::engine::config::JobConfig;
use crate::engine::error::EngineError;
use crate::engine::runner::{CommandRunner, CommandSpec};
use std::fs;
use std::path::{self, Path, PathBuf};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReport {
    pub job_name: String,
    pub script: PathBuf,
    pub memory_mb: u64,
    pub submitted: bool,
}

pub fn build_command(config: &JobConfig) -> CommandSpec {
    CommandSpec::new(config.build_command.as_str())
        .args([
            format!("-j{}", config.cores),
            "-C".to_string(),
            config.settings.project_dir.display().to_string(),
            config.settings.simulator.clone(),
        ])
        .quiet()
}

fn absolute_settings(settings: &JobSettings) -> Result<JobSettings, EngineError> {
    let absolute = |dir: &Path| path::absolute(dir).map_err(|e| EngineError::io(dir, e));
    Ok(JobSettings {
        jobs_dir: absolute(&settings.jobs_dir)?,
        project_dir: absolute(&settings.project_dir)?,
        ..settings.clone()
    })
}

#[instrument(skip_all, name = "submit_workflow")]
pub fn run(config: &JobConfig, runner: &dyn CommandRunner) -> Result<SubmitReport, EngineError> {
    // === Phase 1: Build the simulator ===
    let build = build_command(config);
    info!("Building simulator: {}", build);
    let status = runner.run(&build).map_err(|source| EngineError::Launch {
        command: build.to_string(),
        source,
    })?;
    if !status.success() {
        return Err(EngineError::BuildFailed {
            status: status.to_string(),
        });
    }

    // === Phase 2: Write the batch script ===
    // The scheduler starts the script from its own directory.
    let settings = absolute_settings(&config.settings)?;
    let job = config.job.build(&settings)?;
    let jobs_dir = &settings.jobs_dir;
    fs::create_dir_all(jobs_dir).map_err(|e| EngineError::io(jobs_dir, e))?;
    let script = job.script_path(jobs_dir);
    fs::write(&script, job.render()).map_err(|e| EngineError::io(&script, e))?;
    info!("Wrote batch script {:?} ({} MB)", script, job.memory_mb);

    // === Phase 3: Submit ===
    if config.submit {
        let submit = CommandSpec::new(config.submit_command.as_str()).args([
            "-J".to_string(),
            job.job_name.clone(),
            script.display().to_string(),
        ]);
        runner.spawn(&submit).map_err(|source| EngineError::Launch {
            command: submit.to_string(),
            source,
        })?;
        info!("job {} started", job.job_name);
    }

    Ok(SubmitReport {
        job_name: job.job_name,
        script,
        memory_mb: job.memory_mb,
        submitted: config.submit,
    })
}
