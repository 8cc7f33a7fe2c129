use crate::core::io::g;
use crate::core::sweep::python_list;
use crate::engine::config::{DEFAULT_MELTING_DIR, MeltingSweepConfig, RenormalizationConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::{CommandRunner, CommandSpec};
use itertools::iproduct;
use tracing::{error, info, instrument, warn};

/// Outcome of a sweep. A failing point does not stop the sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepSummary {
    pub launched: usize,
    pub failed: Vec<String>,
}

impl SweepSummary {
    pub fn succeeded(&self) -> usize {
        self.launched - self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

fn run_all(
    commands: Vec<CommandSpec>,
    runner: &dyn CommandRunner,
    reporter: &ProgressReporter,
) -> Result<SweepSummary, EngineError> {
    let mut summary = SweepSummary::default();
    reporter.task(commands.len() as u64, |tick| {
        for command in &commands {
            info!("{}", command);
            summary.launched += 1;
            match runner.run(command) {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    error!("'{}' ended with {}", command, status);
                    summary.failed.push(command.to_string());
                }
                Err(source) => {
                    return Err(EngineError::Launch {
                        command: command.to_string(),
                        source,
                    });
                }
            }
            tick();
        }
        Ok(())
    })?;
    Ok(summary)
}

/// Commands of a melting sweep: every density at each temperature.
pub fn melting_commands(config: &MeltingSweepConfig) -> Result<Vec<CommandSpec>, EngineError> {
    let temperatures = config.temperatures.values()?;
    let densities = config.densities.values()?;

    Ok(iproduct!(temperatures, densities)
        .map(|(kt, rd)| {
            CommandSpec::new(config.program.as_str())
                .current_dir(&config.workdir)
                .args([
                    "--kT".to_string(),
                    g(kt),
                    "--rd".to_string(),
                    g(rd),
                    "--fvstart".to_string(),
                    g(config.fv_start),
                    "--fvend".to_string(),
                    g(config.fv_end),
                    "--fvstep".to_string(),
                    g(config.fv_step),
                    "--gwstart".to_string(),
                    g(config.gw_start),
                    "--gwlend".to_string(),
                    g(config.gw_lattice_end),
                    "--gwlstep".to_string(),
                    g(config.gw_lattice_step),
                    "--dir".to_string(),
                    config.dir.clone(),
                ])
        })
        .collect())
}

#[instrument(skip_all, name = "melting_sweep")]
pub fn melting(
    config: &MeltingSweepConfig,
    runner: &dyn CommandRunner,
    reporter: &ProgressReporter,
) -> Result<SweepSummary, EngineError> {
    if config.dir == DEFAULT_MELTING_DIR && config.workdir.join(&config.dir).exists() {
        warn!(
            "Default data directory '{}' already exists; its files may be overwritten.",
            config.dir
        );
    }

    let commands = melting_commands(config)?;
    info!(
        "Running {} melting point(s) into '{}'",
        commands.len(),
        config.dir
    );
    reporter.report(Progress::PhaseStart { name: "Melting sweep" });
    let summary = run_all(commands, runner, reporter)?;
    reporter.report(Progress::PhaseFinish);
    Ok(summary)
}

/// The free-energy and Monte-Carlo scripts of one RG recursion level. The
/// count list is a single argument that the scripts evaluate.
pub fn renormalization_commands(config: &RenormalizationConfig) -> Vec<CommandSpec> {
    let level = config.level.to_string();
    let ww = g(config.ww);
    let length = g(config.cell_length());
    let counts = python_list(&config.counts);

    let mut absolute = CommandSpec::new(config.python.as_str())
        .current_dir(&config.workdir)
        .args([
            "run-absolute.py".to_string(),
            level.clone(),
            ww.clone(),
            length.clone(),
            counts.clone(),
        ]);
    if config.overwrite {
        absolute = absolute.arg("-O");
    }
    let monte_carlo = CommandSpec::new(config.python.as_str())
        .current_dir(&config.workdir)
        .args([
            "run-monte-carlo.py".to_string(),
            level,
            ww,
            length,
            counts,
        ]);
    vec![absolute, monte_carlo]
}

#[instrument(skip_all, name = "renormalization_sweep")]
pub fn renormalization(
    config: &RenormalizationConfig,
    runner: &dyn CommandRunner,
    reporter: &ProgressReporter,
) -> Result<SweepSummary, EngineError> {
    info!(
        "RG level {}: ww={}, L={}",
        config.level,
        g(config.ww),
        g(config.cell_length())
    );
    reporter.report(Progress::PhaseStart { name: "Renormalization" });
    let summary = run_all(renormalization_commands(config), runner, reporter)?;
    reporter.report(Progress::PhaseFinish);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sweep::ValueSpec;
    use crate::engine::config::{MeltingSweepConfigBuilder, RenormalizationConfigBuilder};
    use crate::engine::runner::{CommandStatus, DryRunRunner};
    use std::io;
    use std::sync::Mutex;

    /// Fails every command whose arguments contain `needle`.
    struct FailingRunner {
        needle: &'static str,
        seen: Mutex<usize>,
    }

    impl CommandRunner for FailingRunner {
        fn run(&self, spec: &CommandSpec) -> io::Result<CommandStatus> {
            *self.seen.lock().unwrap() += 1;
            if spec.args.iter().any(|a| a == self.needle) {
                Ok(CommandStatus { code: Some(2) })
            } else {
                Ok(CommandStatus::SUCCESS)
            }
        }

        fn spawn(&self, _spec: &CommandSpec) -> io::Result<()> {
            Ok(())
        }
    }

    fn melting_config() -> MeltingSweepConfig {
        MeltingSweepConfigBuilder::new()
            .program("figs/new-melting.mkdat".to_string())
            .workdir(".".into())
            .temperatures(ValueSpec::List(vec![1.0, 2.0]))
            .densities(ValueSpec::Range {
                start: 0.8,
                end: 1.0,
                step: 0.1,
            })
            .gw_lattice_step(20.0)
            .dir("melt-test".to_string())
            .build()
            .unwrap()
    }

    #[test]
    fn melting_iterates_densities_within_temperatures() {
        let commands = melting_commands(&melting_config()).unwrap();
        assert_eq!(commands.len(), 6);
        assert_eq!(
            commands[0].to_string(),
            "figs/new-melting.mkdat --kT 1 --rd 0.8 --fvstart 0 --fvend 1 --fvstep 0.2 \
             --gwstart 0.01 --gwlend 2 --gwlstep 20 --dir melt-test"
        );
        assert_eq!(commands[2].args[3], "1");
        assert_eq!(commands[3].args[1], "2");
    }

    #[test]
    fn melting_keeps_going_after_failures() {
        let runner = FailingRunner {
            needle: "0.9",
            seen: Mutex::new(0),
        };
        let summary = melting(&melting_config(), &runner, &ProgressReporter::new()).unwrap();
        assert_eq!(*runner.seen.lock().unwrap(), 6);
        assert_eq!(summary.launched, 6);
        assert_eq!(summary.failed.len(), 2);
        assert_eq!(summary.succeeded(), 4);
        assert!(!summary.is_success());
    }

    #[test]
    fn renormalization_runs_both_scripts() {
        let config = RenormalizationConfigBuilder::new()
            .workdir(".".into())
            .level(1)
            .ww(1.3)
            .base_length(5.0)
            .counts(vec![2, 3, 4])
            .overwrite(true)
            .build()
            .unwrap();
        let runner = DryRunRunner::new();
        let summary = renormalization(&config, &runner, &ProgressReporter::new()).unwrap();

        assert!(summary.is_success());
        let commands = runner.commands();
        assert_eq!(
            commands[0].args,
            vec!["run-absolute.py", "1", "1.3", "10", "[2, 3, 4]", "-O"]
        );
        assert_eq!(
            commands[1].args,
            vec!["run-monte-carlo.py", "1", "1.3", "10", "[2, 3, 4]"]
        );
        assert_eq!(
            commands[1].to_string(),
            "python run-monte-carlo.py 1 1.3 10 '[2, 3, 4]'"
        );
    }
}
