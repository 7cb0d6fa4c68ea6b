/// First-load progress reporter
///
/// The very first collection can take seconds (speed test, port scan), so a
/// spinner ticks on its own cadence until the first snapshot is published.
/// It then clears itself and never restarts: later cycles refresh in the
/// background behind the last-good snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::oneshot;

pub struct ProgressReporter {
    tick: Duration,
    ticks: Arc<AtomicU64>,
}

impl ProgressReporter {
    pub fn new(tick: Duration) -> Self {
        Self {
            tick,
            ticks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of spinner ticks emitted so far. Stops growing permanently
    /// once `run` has returned.
    pub fn tick_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.ticks)
    }

    /// Tick until `first_snapshot` resolves (or its sender is dropped), then
    /// clear the spinner. Terminates within one tick of the signal.
    pub async fn run(self, mut first_snapshot: oneshot::Receiver<()>) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.green.bold} Loading")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars(r"-\|/ "),
        );

        loop {
            tokio::select! {
                _ = &mut first_snapshot => break,
                _ = tokio::time::sleep(self.tick) => {
                    spinner.tick();
                    self.ticks.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        // No residue: the loading line is wiped before the first render
        spinner.finish_and_clear();
    }
}
