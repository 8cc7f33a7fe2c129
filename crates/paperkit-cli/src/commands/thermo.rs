use super::Context;
use crate::cli::ThermoArgs;
use crate::error::{CliError, Result};
use paperkit::core::naming::SystemId;
use paperkit::engine::config::ThermoConfigBuilder;
use paperkit::engine::progress::ProgressReporter;
use paperkit::{render, workflows};
use tracing::info;

pub async fn run(args: ThermoArgs, ctx: &Context) -> Result<()> {
    let settings = &ctx.settings;
    let config = ThermoConfigBuilder::new()
        .data_dir(settings.paths.data_dir.clone())
        .figs_dir(settings.paths.figs_dir.clone())
        .system(SystemId::new(args.ww, args.ff, args.n))
        .methods(args.methods)
        .reference(
            args.reference
                .unwrap_or_else(|| settings.thermo.reference.clone()),
        )
        .max_temperature(settings.thermo.max_temperature)
        .temperature_bins(settings.thermo.temperature_bins)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let progress_handler = ctx.progress_handler();
    let reporter = ProgressReporter::with_callback(progress_handler.callback());

    println!(
        "Computing thermodynamics of {} method(s) against '{}'...",
        config.methods.len(),
        config.reference
    );
    let report = tokio::task::block_in_place(|| workflows::thermo::run(&config, &reporter))?;

    for method in &report.skipped {
        println!("  Skipped '{}': no run files found.", method);
    }
    for table in &report.tables {
        println!("✓ Table written to: {}", table.display());
    }

    if ctx.figures {
        info!("Rendering thermodynamics figures into {:?}", config.figs_dir);
        let figures =
            tokio::task::block_in_place(|| render::thermo::render(&report, &config.figs_dir))?;
        for figure in &figures {
            println!("✓ Figure written to: {}", figure.display());
        }
    }
    Ok(())
}
