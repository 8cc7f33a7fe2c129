use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use paperkit::engine::progress::{Progress, ProgressCallback};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

/// Terminal view of a workflow: a spinner named after the running phase that
/// turns into a step bar while the phase works through sweep points, methods
/// or frames.
#[derive(Clone)]
pub struct ProgressDisplay {
    bar: ProgressBar,
    phase_style: ProgressStyle,
    step_style: ProgressStyle,
}

impl ProgressDisplay {
    pub fn new(quiet: bool) -> Self {
        let target = if quiet {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        Self::with_target(target)
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let phase_style = ProgressStyle::with_template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let step_style = ProgressStyle::with_template(
            "{prefix:.bold:>16} [{bar:32.cyan/blue}] {pos}/{len} ({elapsed})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");

        Self {
            bar: ProgressBar::with_draw_target(Some(0), target).with_style(phase_style.clone()),
            phase_style,
            step_style,
        }
    }

    pub fn callback(&self) -> ProgressCallback<'static> {
        let display = self.clone();
        Box::new(move |event| display.handle(event))
    }

    fn handle(&self, event: Progress) {
        let bar = &self.bar;
        match event {
            Progress::PhaseStart { name } => {
                bar.reset();
                bar.set_style(self.phase_style.clone());
                bar.set_prefix(name);
                bar.set_message("");
                bar.enable_steady_tick(TICK);
            }
            Progress::TaskStart { total_steps } => {
                bar.disable_steady_tick();
                bar.set_style(self.step_style.clone());
                bar.set_length(total_steps);
                bar.set_position(0);
            }
            Progress::TaskIncrement => bar.inc(1),
            Progress::TaskFinish => {
                if let Some(length) = bar.length() {
                    bar.set_position(length);
                }
            }
            Progress::PhaseFinish => {
                bar.disable_steady_tick();
                bar.set_style(self.phase_style.clone());
                bar.finish_with_message(format!("✓ ({:.1?})", bar.elapsed()));
            }
            Progress::Message(text) => bar.println(format!("  {}", text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn hidden() -> ProgressDisplay {
        ProgressDisplay::new(true)
    }

    #[test]
    fn phases_name_the_bar_and_finish_with_a_check() {
        let display = hidden();
        let callback = display.callback();

        callback(Progress::PhaseStart {
            name: "Melting sweep",
        });
        assert_eq!(display.bar.prefix(), "Melting sweep");
        assert!(!display.bar.is_finished());

        callback(Progress::PhaseFinish);
        assert!(display.bar.is_finished());
        assert!(display.bar.message().starts_with('✓'));
    }

    #[test]
    fn steps_are_counted_and_completed() {
        let display = hidden();
        let callback = display.callback();

        callback(Progress::PhaseStart { name: "Methods" });
        callback(Progress::TaskStart { total_steps: 6 });
        callback(Progress::TaskIncrement);
        callback(Progress::TaskIncrement);
        assert_eq!(display.bar.length(), Some(6));
        assert_eq!(display.bar.position(), 2);

        callback(Progress::TaskFinish);
        assert_eq!(display.bar.position(), 6);
    }

    #[test]
    fn a_new_phase_starts_from_zero() {
        let display = hidden();
        let callback = display.callback();

        callback(Progress::PhaseStart { name: "Reference" });
        callback(Progress::TaskStart { total_steps: 3 });
        callback(Progress::TaskFinish);
        callback(Progress::PhaseFinish);
        callback(Progress::PhaseStart { name: "Comparison" });

        assert_eq!(display.bar.position(), 0);
        assert_eq!(display.bar.prefix(), "Comparison");
    }

    #[test]
    fn events_may_come_from_worker_threads() {
        let display = hidden();
        let callback = display.callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Comparison" });
            callback(Progress::Message("3 frames".to_string()));
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        assert!(display.bar.is_finished());
    }
}
