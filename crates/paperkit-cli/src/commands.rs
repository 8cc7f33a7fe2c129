pub mod compare;
pub mod melting;
pub mod renormalization;
pub mod submit;
pub mod thermo;
pub mod triplet;

use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::utils::progress::ProgressDisplay;
use paperkit::engine::runner::{CommandRunner, DryRunRunner, SystemRunner};
use paperkit::workflows::sweeps::SweepSummary;

/// Global options every subcommand sees.
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
    pub dry_run: bool,
    pub figures: bool,
    pub quiet: bool,
}

impl Context {
    pub fn progress_handler(&self) -> ProgressDisplay {
        ProgressDisplay::new(self.quiet)
    }

    /// Runs `body` with the process runner, or with a recorder whose commands
    /// are printed afterwards when `--dry-run` is set.
    pub fn with_runner<T>(&self, body: impl FnOnce(&dyn CommandRunner) -> T) -> T {
        if self.dry_run {
            let runner = DryRunRunner::new();
            let result = body(&runner);
            for command in runner.commands() {
                println!("{}", command);
            }
            result
        } else {
            body(&SystemRunner)
        }
    }
}

fn check_sweep(summary: &SweepSummary) -> Result<()> {
    if summary.is_success() {
        println!("✓ {} command(s) finished.", summary.launched);
        return Ok(());
    }
    for command in &summary.failed {
        eprintln!("  failed: {}", command);
    }
    Err(CliError::SweepFailed {
        failed: summary.failed.len(),
        launched: summary.launched,
    })
}
