/// Progress events emitted while a graph is being built.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    StrategyStart { name: &'static str },
    StrategyFinish { name: &'static str, edges: usize },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional callback.
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

    /// Reports the start of a phase, runs `f`, then reports the finish.
    ///
    /// The finish event is emitted only when `f` succeeds.
    pub fn phase<T, E>(&self, name: &'static str, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        self.report(Progress::PhaseStart { name });
        let result = f()?;
        self.report(Progress::PhaseFinish);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_reporter(events: Arc<Mutex<Vec<String>>>) -> ProgressReporter<'static> {
        ProgressReporter::with_callback(Box::new(move |event| {
            events.lock().unwrap().push(format!("{:?}", event));
        }))
    }

    #[test]
    fn reporter_without_callback_is_silent() {
        ProgressReporter::new().report(Progress::Message("ignored".into()));
    }

    #[test]
    fn phase_reports_start_and_finish_on_success() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let reporter = recording_reporter(events.clone());
        let value: Result<u32, ()> = reporter.phase("Nodes", || Ok(3));
        assert_eq!(value, Ok(3));
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].contains("Nodes"));
        assert_eq!(events[1], "PhaseFinish");
    }

    #[test]
    fn phase_skips_finish_on_error() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let reporter = recording_reporter(events.clone());
        let value: Result<(), &str> = reporter.phase("Edges", || Err("boom"));
        assert_eq!(value, Err("boom"));
        assert_eq!(events.lock().unwrap().len(), 1);
    }
}
