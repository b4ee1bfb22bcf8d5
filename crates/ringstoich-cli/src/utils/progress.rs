use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use ringstoich::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// What the current phase is and the worst copy fit seen while chaining.
#[derive(Debug, Default)]
struct RunState {
    phase: &'static str,
    worst_fit: f64,
}

/// Terminal display for the Replicate, Align and Measure phases of a run.
///
/// Replicate and Measure show a spinner; Align shows one bar step per chained
/// copy, labelled with that copy's fit RMSD.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: ProgressBar,
    state: Arc<Mutex<RunState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        Self {
            pb,
            state: Arc::new(Mutex::new(RunState::default())),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress state mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    state.phase = name;
                    pb.reset();
                    pb.set_style(spinner_style());
                    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb.set_message(phase_label(name));
                }
                Progress::TaskStart { total_steps } => {
                    state.worst_fit = 0.0;
                    pb.disable_steady_tick();
                    pb.reset();
                    pb.set_length(total_steps);
                    pb.set_style(alignment_style());
                    pb.set_message("");
                }
                Progress::AlignmentStep { copy, rmsd } => {
                    state.worst_fit = state.worst_fit.max(rmsd);
                    pb.set_message(format!("c{} fit {:.3} Å", copy, rmsd));
                }
                Progress::TaskIncrement => pb.inc(1),
                Progress::TaskFinish => {
                    pb.set_message(format!(
                        "{} copies chained, worst fit {:.3} Å",
                        pb.position(),
                        state.worst_fit
                    ));
                }
                Progress::PhaseFinish => {
                    pb.disable_steady_tick();
                    let summary = if state.phase == "Align" {
                        format!("✓ {}", pb.message())
                    } else {
                        format!("✓ {}", phase_label(state.phase))
                    };
                    pb.finish_with_message(summary);
                }
                Progress::Message(msg) => pb.println(format!("  {}", msg)),
            }
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn phase_label(phase: &str) -> String {
    match phase {
        "Replicate" => "Replicating dimer".to_string(),
        "Align" => "Chaining copies".to_string(),
        "Measure" => "Measuring RMSD curve".to_string(),
        other => other.to_string(),
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .expect("Failed to create spinner style template")
}

fn alignment_style() -> ProgressStyle {
    ProgressStyle::with_template("Chaining copies [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .expect("Failed to create alignment style template")
        .progress_chars("##-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn hidden_handler() -> CliProgressHandler {
        CliProgressHandler::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn spinner_phases_finish_with_their_label() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Replicate" });
        assert_eq!(handler.pb.message(), "Replicating dimer");
        assert!(!handler.pb.is_finished());

        callback(Progress::PhaseFinish);
        assert!(handler.pb.is_finished());
        assert_eq!(handler.pb.message(), "✓ Replicating dimer");
    }

    #[test]
    fn align_phase_counts_copies_and_reports_worst_fit() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Align" });
        callback(Progress::TaskStart { total_steps: 3 });
        assert_eq!(handler.pb.length(), Some(3));
        assert_eq!(handler.pb.position(), 0);

        for (copy, rmsd) in [(1, 0.0123), (2, 0.4561), (3, 0.2)] {
            callback(Progress::AlignmentStep { copy, rmsd });
            callback(Progress::TaskIncrement);
        }
        assert_eq!(handler.pb.position(), 3);
        assert_eq!(handler.pb.message(), "c3 fit 0.200 Å");

        callback(Progress::TaskFinish);
        callback(Progress::PhaseFinish);
        assert!(handler.pb.is_finished());
        assert_eq!(
            handler.pb.message(),
            "✓ 3 copies chained, worst fit 0.456 Å"
        );
    }

    #[test]
    fn worst_fit_resets_between_runs() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::TaskStart { total_steps: 1 });
        callback(Progress::AlignmentStep { copy: 1, rmsd: 2.5 });
        callback(Progress::TaskStart { total_steps: 1 });
        callback(Progress::AlignmentStep { copy: 1, rmsd: 0.1 });
        callback(Progress::TaskIncrement);
        callback(Progress::TaskFinish);

        assert_eq!(handler.pb.message(), "1 copies chained, worst fit 0.100 Å");
    }

    #[test]
    fn callback_can_run_on_another_thread() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Measure" });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        assert!(handler.pb.is_finished());
        assert_eq!(handler.pb.message(), "✓ Measuring RMSD curve");
    }
}
