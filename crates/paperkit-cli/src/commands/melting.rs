use super::{Context, check_sweep};
use crate::cli::MeltingArgs;
use crate::error::{CliError, Result};
use paperkit::core::sweep::ValueSpec;
use paperkit::engine::config::{MeltingSweepConfig, MeltingSweepConfigBuilder};
use paperkit::engine::progress::ProgressReporter;
use paperkit::workflows;
use std::path::PathBuf;

fn stepped(
    list: Vec<f64>,
    start: Option<f64>,
    end: Option<f64>,
    step: f64,
    what: &str,
) -> Result<Option<ValueSpec>> {
    if !list.is_empty() {
        return Ok(Some(ValueSpec::List(list)));
    }
    match (start, end) {
        (Some(start), Some(end)) => Ok(Some(ValueSpec::Range { start, end, step })),
        (None, None) => Ok(None),
        _ => Err(CliError::Argument(format!(
            "a {} range needs both a start and an end",
            what
        ))),
    }
}

pub fn build_config(
    args: MeltingArgs,
    ctx: &Context,
    workdir: PathBuf,
) -> Result<MeltingSweepConfig> {
    let densities = stepped(args.densities, args.nstart, args.nend, args.nstep, "density")?
        .ok_or_else(|| CliError::Argument("either --n or --nstart/--nend is required".into()))?;
    let temperatures = stepped(
        args.temperatures,
        args.tstart,
        args.tend,
        args.tstep,
        "temperature",
    )?;

    let mut builder = MeltingSweepConfigBuilder::new()
        .program(ctx.settings.sweep.melting_program.clone())
        .workdir(workdir)
        .densities(densities);
    if let Some(spec) = temperatures {
        builder = builder.temperatures(spec);
    }
    if let Some(v) = args.fvstart {
        builder = builder.fv_start(v);
    }
    if let Some(v) = args.fvend {
        builder = builder.fv_end(v);
    }
    if let Some(v) = args.fvstep {
        builder = builder.fv_step(v);
    }
    if let Some(v) = args.gwstart {
        builder = builder.gw_start(v);
    }
    if let Some(v) = args.gwlend {
        builder = builder.gw_lattice_end(v);
    }
    if let Some(v) = args.gwlstep {
        builder = builder.gw_lattice_step(v);
    }
    if let Some(dir) = args.dir {
        builder = builder.dir(dir);
    }
    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

pub async fn run(args: MeltingArgs, ctx: &Context) -> Result<()> {
    let config = build_config(args, ctx, std::env::current_dir()?)?;

    let progress_handler = ctx.progress_handler();
    let reporter = ProgressReporter::with_callback(progress_handler.callback());

    let summary = tokio::task::block_in_place(|| {
        ctx.with_runner(|runner| workflows::sweeps::melting(&config, runner, &reporter))
    })?;
    check_sweep(&summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::config::{FileConfig, build_settings};
    use clap::Parser;
    use paperkit::workflows::sweeps::melting_commands;

    fn context() -> Context {
        Context {
            settings: build_settings(
                FileConfig::default(),
                &["sweep.melting-program=./melt".to_string()],
            )
            .unwrap(),
            dry_run: true,
            figures: false,
            quiet: true,
        }
    }

    fn melting_args(argv: &[&str]) -> MeltingArgs {
        let argv = ["paperkit", "melting"].iter().chain(argv).copied();
        match Cli::parse_from(argv).command {
            Commands::Melting(args) => args,
            other => panic!("expected 'melting' subcommand, got {:?}", other),
        }
    }

    #[test]
    fn density_range_includes_its_end() {
        let args = melting_args(&["--nstart", "0.8", "--nend", "1.0", "--t", "1", "2"]);
        let config = build_config(args, &context(), ".".into()).unwrap();

        let commands = melting_commands(&config).unwrap();
        assert_eq!(commands.len(), 6);
        assert_eq!(commands[0].program, "./melt");
        assert_eq!(commands[2].args[3], "1");
        assert_eq!(commands[5].args[1], "2");
    }

    #[test]
    fn passes_overrides_through() {
        let args = melting_args(&["--n", "1.1", "--gwlstep", "20", "--d", "melt-run"]);
        let config = build_config(args, &context(), ".".into()).unwrap();

        assert_eq!(config.temperatures, ValueSpec::List(vec![2.0]));
        assert_eq!(config.gw_lattice_step, 20.0);
        assert_eq!(config.dir, "melt-run");
        assert_eq!(config.fv_step, 0.2);
    }

    #[test]
    fn temperature_range_uses_its_step() {
        let args = melting_args(&["--n", "1.0", "--tstart", "1", "--tend", "3", "--tstep", "0.5"]);
        let config = build_config(args, &context(), ".".into()).unwrap();
        assert_eq!(
            config.temperatures,
            ValueSpec::Range {
                start: 1.0,
                end: 3.0,
                step: 0.5
            }
        );
    }
}
