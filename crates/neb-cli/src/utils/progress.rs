use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use nebpp::engine::progress::{Progress, ProgressCallback, StatusUpdate};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Bar plus the relaxation figures the status line is rendered from.
struct BarState {
    pb: ProgressBar,
    phase: &'static str,
    force_threshold: f64,
    best_force: f64,
}

/// Renders engine progress on stderr: a spinner per phase and an iteration bar whose message
/// tracks the largest force, the best force so far, and whether it is under the threshold.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new(force_threshold: f64) -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr(), force_threshold)
    }

    #[cfg(test)]
    fn hidden(force_threshold: f64) -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden(), force_threshold)
    }

    fn with_draw_target(target: ProgressDrawTarget, force_threshold: f64) -> Self {
        let pb = ProgressBar::new(0)
            .with_style(spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(target);
        pb.disable_steady_tick();
        pb.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(BarState {
                pb,
                phase: "Initializing",
                force_threshold,
                best_force: f64::INFINITY,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = Arc::clone(&self.state);

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress state mutex was poisoned. Cannot update progress.");
                return;
            };
            state.apply(progress);
        })
    }
}

impl BarState {
    fn apply(&mut self, progress: Progress) {
        let pb = &self.pb;
        match progress {
            Progress::PhaseStart { name } => {
                self.phase = name;
                pb.reset();
                pb.set_length(0);
                pb.set_style(spinner_style());
                pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                pb.set_message(name);
            }
            Progress::PhaseFinish => {
                pb.disable_steady_tick();
                pb.finish_with_message(format!("✓ {}", self.phase));
            }
            Progress::TaskStart { total_steps } => {
                self.best_force = f64::INFINITY;
                pb.disable_steady_tick();
                pb.reset();
                pb.set_length(total_steps);
                pb.set_position(0);
                pb.set_style(bar_style());
                pb.set_message(self.phase);
            }
            Progress::TaskIncrement => {
                pb.inc(1);
            }
            Progress::TaskFinish => {
                let total = pb.length().unwrap_or(0);
                if pb.position() < total {
                    pb.set_position(total);
                }
                pb.finish();
            }
            Progress::Status(status) => {
                self.best_force = self.best_force.min(status.max_force);
                let message = self.status_message(&status);
                self.pb.set_message(message);
            }
            Progress::Message(msg) => {
                if !pb.is_finished() {
                    pb.println(format!("  {}", msg));
                } else {
                    pb.set_message(msg);
                }
            }
        }
    }

    fn status_message(&self, status: &StatusUpdate) -> String {
        let marker = if status.max_force < self.force_threshold {
            " ✓"
        } else {
            ""
        };
        format!(
            "it {:>4}  |F|max {:.3e}{}  best {:.3e}  Emax {:.4}",
            status.iteration, status.max_force, marker, self.best_force, status.max_energy
        )
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<52} [{bar:30.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key(
            "eta",
            |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
            },
        )
        .progress_chars("##-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn status(iteration: usize, max_force: f64) -> Progress {
        Progress::Status(StatusUpdate {
            iteration,
            max_force,
            max_energy: -1.5,
        })
    }

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::hidden(0.05);
        let state = handler.state.lock().unwrap();
        assert_eq!(state.pb.length(), Some(0));
        assert!(state.pb.is_finished());
        assert!(state.best_force.is_infinite());
    }

    #[test]
    fn callback_updates_progress_bar_state() {
        let handler = CliProgressHandler::hidden(0.05);
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Relaxation" });
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.pb.message(), "Relaxation");
            assert!(!state.pb.is_finished());
        }

        callback(Progress::TaskStart { total_steps: 100 });
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.pb.length(), Some(100));
            assert_eq!(state.pb.position(), 0);
        }

        callback(Progress::TaskIncrement);
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.pb.position(), 1);
        }

        callback(Progress::TaskFinish);
        {
            let state = handler.state.lock().unwrap();
            assert!(state.pb.is_finished());
            assert_eq!(state.pb.position(), 100);
        }

        callback(Progress::PhaseFinish);
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.pb.message(), "✓ Relaxation");
        }
    }

    #[test]
    fn status_line_tracks_the_best_force_and_the_threshold() {
        let handler = CliProgressHandler::hidden(0.05);
        let callback = handler.get_callback();
        callback(Progress::TaskStart { total_steps: 10 });

        callback(status(3, 0.125));
        assert_eq!(
            handler.state.lock().unwrap().pb.message(),
            "it    3  |F|max 1.250e-1  best 1.250e-1  Emax -1.5000"
        );

        callback(status(4, 0.04));
        assert_eq!(
            handler.state.lock().unwrap().pb.message(),
            "it    4  |F|max 4.000e-2 ✓  best 4.000e-2  Emax -1.5000"
        );

        callback(status(5, 0.2));
        assert_eq!(
            handler.state.lock().unwrap().pb.message(),
            "it    5  |F|max 2.000e-1  best 4.000e-2  Emax -1.5000"
        );
    }

    #[test]
    fn a_new_task_resets_the_best_force() {
        let handler = CliProgressHandler::hidden(0.05);
        let callback = handler.get_callback();
        callback(Progress::TaskStart { total_steps: 10 });
        callback(status(0, 0.01));
        callback(Progress::TaskStart { total_steps: 10 });
        assert!(handler.state.lock().unwrap().best_force.is_infinite());
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::hidden(0.05);
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Thread Test",
            });
            callback(Progress::TaskIncrement);
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let state = handler.state.lock().unwrap();
        assert!(state.pb.is_finished());
        assert_eq!(state.pb.message(), "✓ Thread Test");
    }
}
