use super::Context;
use crate::cli::CompareArgs;
use crate::error::{CliError, Result};
use paperkit::engine::config::ComparisonConfigBuilder;
use paperkit::engine::progress::ProgressReporter;
use paperkit::workflows;

pub async fn run(args: CompareArgs, ctx: &Context) -> Result<()> {
    let config = ComparisonConfigBuilder::new()
        .data_dir(ctx.settings.paths.data_dir.clone())
        .energy(args.energy)
        .reference(args.reference)
        .filebase(args.filebase)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let progress_handler = ctx.progress_handler();
    let reporter = ProgressReporter::with_callback(progress_handler.callback());

    println!("Comparing movie frames at E = {}...", config.energy);
    let report = tokio::task::block_in_place(|| workflows::comparison::run(&config, &reporter))?;

    if report.histories.is_empty() {
        println!("Warning: none of the {} method(s) had movie frames.", report.methods.len());
    }
    for (history, dir) in report.histories.iter().zip(&report.output_dirs) {
        println!(
            "✓ {} ({} frame(s)) written to: {}",
            history.method,
            history.frames.len(),
            dir.display()
        );
    }
    Ok(())
}
