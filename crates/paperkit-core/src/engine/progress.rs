/// Events a workflow emits while it runs. Front ends decide how (and whether)
/// to show them.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    pub fn message(&self, text: impl Into<String>) {
        self.report(Progress::Message(text.into()));
    }

    /// Reports a task of `total_steps` steps around `body`, which receives a
    /// closure to call once per finished step.
    pub fn task<T>(&self, total_steps: u64, body: impl FnOnce(&dyn Fn()) -> T) -> T {
        self.report(Progress::TaskStart { total_steps });
        let result = body(&|| self.report(Progress::TaskIncrement));
        self.report(Progress::TaskFinish);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording() -> (ProgressReporter<'static>, Arc<Mutex<Vec<String>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(format!("{:?}", event));
        }));
        (reporter, events)
    }

    #[test]
    fn silent_reporter_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::PhaseFinish);
        reporter.message("nothing happens");
    }

    #[test]
    fn task_wraps_body_with_start_and_finish() {
        let (reporter, events) = recording();
        let value = reporter.task(2, |tick| {
            tick();
            tick();
            7
        });

        assert_eq!(value, 7);
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "TaskStart { total_steps: 2 }",
                "TaskIncrement",
                "TaskIncrement",
                "TaskFinish"
            ]
        );
    }
}
