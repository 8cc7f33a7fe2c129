use super::Context;
use crate::cli::TripletArgs;
use crate::error::{CliError, Result};
use paperkit::engine::config::TripletConfigBuilder;
use paperkit::workflows::triplet::TripletFigure;
use paperkit::{render, workflows};

pub async fn run(args: TripletArgs, ctx: &Context) -> Result<()> {
    let config = TripletConfigBuilder::new()
        .figs_dir(ctx.settings.paths.figs_dir.clone())
        .ff(args.ff)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let figure = tokio::task::block_in_place(|| workflows::triplet::run(&config))?;
    match &figure {
        TripletFigure::Missing { missing, .. } => {
            println!("Warning: missing path data {}", missing.display());
        }
        TripletFigure::Complete(panels) => {
            println!(
                "Triplet field for η = {} peaks at g = {:.3}.",
                panels.ff,
                panels.field.g_max()
            );
        }
    }

    if ctx.figures {
        let path =
            tokio::task::block_in_place(|| render::triplet::render(&figure, &config.figs_dir))?;
        println!("✓ Figure written to: {}", path.display());
    }
    Ok(())
}
