use indicatif::{ProgressBar, ProgressStyle};
use molgraph::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders workflow progress as a single spinner on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.finish_and_clear();
        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    #[cfg(test)]
    fn hidden() -> Self {
        Self {
            pb: Arc::new(Mutex::new(ProgressBar::hidden())),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };
            match progress {
                Progress::PhaseStart { name } => {
                    pb.reset();
                    pb.set_style(Self::spinner_style());
                    pb.set_message(name);
                    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                }
                Progress::PhaseFinish => {
                    pb.disable_steady_tick();
                    pb.finish_with_message("✓ Done");
                }
                Progress::StrategyStart { name } => {
                    pb.set_message(format!("Building {} edges", name));
                }
                Progress::StrategyFinish { name, edges } => {
                    pb.println(format!("  {} edges: {}", name, edges));
                }
                Progress::Message(msg) => {
                    pb.set_message(msg);
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::new();
        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
    }

    #[test]
    fn callback_tracks_phases_and_strategies() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Edges" });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.message(), "Edges");
            assert!(!pb.is_finished());
        }

        callback(Progress::StrategyStart { name: "distance" });
        assert_eq!(
            handler.pb.lock().unwrap().message(),
            "Building distance edges"
        );

        callback(Progress::StrategyFinish {
            name: "distance",
            edges: 12,
        });
        callback(Progress::Message("Aligning features".to_string()));
        assert_eq!(handler.pb.lock().unwrap().message(), "Aligning features");

        callback(Progress::PhaseFinish);
        {
            let pb = handler.pb.lock().unwrap();
            assert!(pb.is_finished());
            assert_eq!(pb.message(), "✓ Done");
        }
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Nodes" });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ Done");
    }
}
