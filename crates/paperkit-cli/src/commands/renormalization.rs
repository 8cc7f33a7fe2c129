use super::{Context, check_sweep};
use crate::cli::RenormalizationArgs;
use crate::error::{CliError, Result};
use paperkit::core::sweep::parse_count_list;
use paperkit::engine::config::RenormalizationConfigBuilder;
use paperkit::engine::progress::ProgressReporter;
use paperkit::workflows;

pub async fn run(args: RenormalizationArgs, ctx: &Context) -> Result<()> {
    let counts =
        parse_count_list(&args.counts).map_err(|e| CliError::Argument(e.to_string()))?;
    let config = RenormalizationConfigBuilder::new()
        .python(ctx.settings.sweep.python.clone())
        .workdir(std::env::current_dir()?)
        .level(args.level)
        .ww(args.ww)
        .base_length(args.length)
        .counts(counts)
        .overwrite(args.overwrite)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let progress_handler = ctx.progress_handler();
    let reporter = ProgressReporter::with_callback(progress_handler.callback());

    let summary = tokio::task::block_in_place(|| {
        ctx.with_runner(|runner| workflows::sweeps::renormalization(&config, runner, &reporter))
    })?;
    check_sweep(&summary)
}
