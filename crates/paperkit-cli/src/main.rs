mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::commands::Context;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    let command_result = async move {
        info!("🚀 paperkit v{} starting up.", env!("CARGO_PKG_VERSION"));
        debug!("Full CLI arguments parsed: {:?}", &cli);

        if let Some(num_threads) = cli.threads {
            info!(
                "Setting Rayon global thread pool to {} threads.",
                num_threads
            );
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
                .map_err(|e| {
                    CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
                })?;
        }

        let ctx = Context {
            settings: config::load_settings(cli.config.as_deref(), &cli.set_values)?,
            dry_run: cli.dry_run,
            figures: !cli.no_figures,
            quiet: cli.quiet,
        };

        match cli.command {
            Commands::Thermo(args) => {
                info!("Dispatching to 'thermo' command.");
                commands::thermo::run(args, &ctx).await
            }
            Commands::Compare(args) => {
                info!("Dispatching to 'compare' command.");
                commands::compare::run(args, &ctx).await
            }
            Commands::Triplet(args) => {
                info!("Dispatching to 'triplet' command.");
                commands::triplet::run(args, &ctx).await
            }
            Commands::Melting(args) => {
                info!("Dispatching to 'melting' command.");
                commands::melting::run(args, &ctx).await
            }
            Commands::Renormalization(args) => {
                info!("Dispatching to 'renormalization' command.");
                commands::renormalization::run(args, &ctx).await
            }
            Commands::Submit(args) => {
                info!("Dispatching to 'submit' command.");
                commands::submit::run(args, &ctx).await
            }
        }
    }
    .await;

    match &command_result {
        Ok(_) => {
            info!("✅ Command completed successfully.");
            println!("✅ Command completed successfully.");
        }
        Err(e) => {
            error!("❌ Command failed: {}", e);
            eprintln!("❌ Command failed: {}", e);
        }
    }

    command_result
}
