use super::Context;
use crate::cli::SubmitArgs;
use crate::error::{CliError, Result};
use paperkit::core::batch::SquareWellJob;
use paperkit::core::naming::SystemId;
use paperkit::engine::config::{JobConfig, JobConfigBuilder};
use paperkit::workflows;
use tracing::info;

pub fn build_config(args: SubmitArgs, ctx: &Context) -> Result<JobConfig> {
    let settings = &ctx.settings;
    if args.values.len() % 2 != 0 {
        return Err(CliError::Argument(format!(
            "--values expects name/value pairs, got {} item(s)",
            args.values.len()
        )));
    }
    let job = SquareWellJob {
        system: SystemId::new(args.ww, args.ff, args.n),
        method: args.method,
        suffix: args.suffix.filter(|s| !s.is_empty()),
        values: args.values,
        toggles: args.toggles,
    };

    JobConfigBuilder::new()
        .job(job)
        .jobs_dir(settings.paths.jobs_dir.clone())
        .project_dir(settings.paths.project_dir.clone())
        .simulator(settings.simulator.name.clone())
        .memory_per_particle(settings.cluster.memory_per_particle)
        .cores(args.cores.unwrap_or(settings.cluster.cores))
        .build_command(settings.simulator.build_command.clone())
        .submit(args.submit || settings.cluster.submit)
        .submit_command(settings.cluster.submit_command.clone())
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

pub async fn run(args: SubmitArgs, ctx: &Context) -> Result<()> {
    let config = build_config(args, ctx)?;
    info!("Preparing job {}", config.job.job_name());

    let report = tokio::task::block_in_place(|| {
        ctx.with_runner(|runner| workflows::submit::run(&config, runner))
    })?;

    println!(
        "✓ Batch script for {} ({} MB) written to: {}",
        report.job_name,
        report.memory_mb,
        report.script.display()
    );
    if report.submitted && !ctx.dry_run {
        println!("job {} started", report.job_name);
    } else if !report.submitted {
        println!("Not submitted (set cluster.submit = true or pass --submit).");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::config::{FileConfig, build_settings};
    use clap::Parser;

    fn context(set_values: &[&str]) -> Context {
        let set_values: Vec<String> = set_values.iter().map(|s| s.to_string()).collect();
        Context {
            settings: build_settings(FileConfig::default(), &set_values).unwrap(),
            dry_run: true,
            figures: false,
            quiet: true,
        }
    }

    fn submit_args(argv: &[&str]) -> SubmitArgs {
        let argv = ["paperkit", "submit"].iter().chain(argv).copied();
        match Cli::parse_from(argv).command {
            Commands::Submit(args) => args,
            other => panic!("expected 'submit' subcommand, got {:?}", other),
        }
    }

    #[test]
    fn cluster_settings_feed_the_job() {
        let args = submit_args(&["1.3", "0.3", "10", "tmmc", "--suffix", "rerun"]);
        let config = build_config(args, &context(&["cluster.memory-per-particle=30"])).unwrap();

        assert_eq!(config.job.job_name(), "periodic-ww1.30-ff0.30-N10-tmmc-rerun");
        assert_eq!(config.settings.memory_per_particle, 30);
        assert_eq!(config.cores, 4);
        assert!(!config.submit);
    }

    #[test]
    fn flags_override_cluster_settings() {
        let args = submit_args(&["1.3", "0.3", "10", "tmmc", "--cores", "6", "--submit"]);
        let config = build_config(args, &context(&["cluster.cores=2"])).unwrap();
        assert_eq!(config.cores, 6);
        assert!(config.submit);
    }

    #[test]
    fn unpaired_values_are_rejected() {
        let args = submit_args(&["1.3", "0.3", "10", "tmmc", "--values", "iterations"]);
        let result = build_config(args, &context(&[]));
        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
