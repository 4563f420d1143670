use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use linescale::engine::progress::{Progress, ProgressCallback};
use linescale::engine::scaler::{PARTITION_PHASE, SCALING_PHASE};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 100;

/// indicatif template for a scaler phase; the prefix carries the molecule.
fn template_for(phase: &str) -> &'static str {
    match phase {
        PARTITION_PHASE => "{prefix:.bold} {spinner:.green} {msg} ({pos}/{len} isotopologues)",
        SCALING_PHASE => "{prefix:.bold} [{bar:32.cyan/blue}] {percent:>3}% {msg}",
        _ => "{spinner:.green} {msg}",
    }
}

/// Terminal view of a scaling run.
///
/// The workflow announces each molecule with a `Progress::Message`, which
/// becomes the bar prefix; the scaler's two phases then redraw the same bar.
/// A finished scaling phase leaves one summary line per molecule above it.
#[derive(Clone)]
pub struct ScaleProgressBar {
    bar: ProgressBar,
}

impl ScaleProgressBar {
    pub fn stderr() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            bar: ProgressBar::with_draw_target(Some(0), target),
        }
    }

    pub fn callback(&self) -> ProgressCallback<'static> {
        let view = self.clone();
        Box::new(move |event| view.handle(event))
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn handle(&self, event: Progress) {
        match event {
            Progress::Message(molecule) => self.bar.set_prefix(molecule),
            Progress::PhaseStart { name } => {
                self.bar.reset();
                if let Ok(style) = ProgressStyle::with_template(template_for(name)) {
                    self.bar.set_style(style.progress_chars("=> "));
                }
                self.bar.set_message(name);
                self.bar
                    .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            }
            Progress::TaskStart { total_steps } => {
                self.bar.set_length(total_steps);
                self.bar.set_position(0);
            }
            Progress::TaskIncrement => self.bar.inc(1),
            Progress::TaskFinish => {
                if let Some(length) = self.bar.length() {
                    self.bar.set_position(length);
                }
            }
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                if self.bar.message() == SCALING_PHASE {
                    self.bar.println(format!("  ✓ {}", self.bar.prefix()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linescale::engine::progress::ProgressReporter;

    fn run_molecule(reporter: &ProgressReporter, molecule: &str, isotopologues: u64, chunks: u64) {
        reporter.report(Progress::Message(molecule.to_string()));
        reporter.report(Progress::PhaseStart {
            name: PARTITION_PHASE,
        });
        reporter.report(Progress::TaskStart {
            total_steps: isotopologues,
        });
        for _ in 0..isotopologues {
            reporter.report(Progress::TaskIncrement);
        }
        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);
        reporter.report(Progress::PhaseStart {
            name: SCALING_PHASE,
        });
        reporter.report(Progress::TaskStart { total_steps: chunks });
        reporter.report(Progress::TaskIncrement);
    }

    #[test]
    fn each_scaler_phase_has_its_own_template() {
        assert!(template_for(PARTITION_PHASE).contains("isotopologues"));
        assert!(template_for(SCALING_PHASE).contains("{bar"));
        assert!(template_for("Loading").starts_with("{spinner"));
        for phase in [PARTITION_PHASE, SCALING_PHASE, "Loading"] {
            assert!(ProgressStyle::with_template(template_for(phase)).is_ok());
        }
    }

    #[test]
    fn molecule_message_becomes_the_prefix() {
        let view = ScaleProgressBar::hidden();
        let reporter = ProgressReporter::with_callback(view.callback());

        run_molecule(&reporter, "CO2: 5 line(s)", 2, 3);

        assert_eq!(view.bar.prefix(), "CO2: 5 line(s)");
        assert_eq!(view.bar.message(), SCALING_PHASE);
        assert_eq!(view.bar.length(), Some(3));
        assert_eq!(view.bar.position(), 1);
    }

    #[test]
    fn each_phase_restarts_the_count() {
        let view = ScaleProgressBar::hidden();
        let reporter = ProgressReporter::with_callback(view.callback());

        run_molecule(&reporter, "CO2: 5 line(s)", 2, 3);
        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);
        assert_eq!(view.bar.position(), 3);

        run_molecule(&reporter, "CO: 1 line(s)", 1, 1);
        assert_eq!(view.bar.prefix(), "CO: 1 line(s)");
        assert_eq!(view.bar.length(), Some(1));
        assert_eq!(view.bar.position(), 1);
    }

    #[test]
    fn finish_clears_the_bar() {
        let view = ScaleProgressBar::hidden();
        let reporter = ProgressReporter::with_callback(view.callback());
        run_molecule(&reporter, "H2O: 9 line(s)", 1, 1);

        view.finish();

        assert!(view.bar.is_finished());
    }

    #[test]
    fn events_from_worker_threads_are_applied() {
        let view = ScaleProgressBar::hidden();
        let reporter = ProgressReporter::with_callback(view.callback());
        reporter.report(Progress::PhaseStart {
            name: PARTITION_PHASE,
        });
        reporter.report(Progress::TaskStart { total_steps: 8 });

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| reporter.report(Progress::TaskIncrement));
            }
        });

        assert_eq!(view.bar.position(), 8);
    }
}
