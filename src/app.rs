/// Dashboard application
///
/// Wires the probe registry, collector, scheduler and progress reporter
/// together and drives the render loop. Readers of the published snapshot
/// never block on collection: the last-good snapshot stays on screen while
/// the next cycle refreshes in the background.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{oneshot, watch};

use crate::cli::Cli;
use crate::core::{Collector, ProbeRegistry, ProgressReporter, Scheduler};
use crate::probes::{self, ProbeTuning};
use crate::screens::Dashboard;
use crate::utils::AppConfig;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);
const DEFAULT_TICK: Duration = Duration::from_millis(100);
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_COLUMNS: usize = 2;

/// Runtime settings resolved from CLI flags over the config file over
/// built-in defaults.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub interval: Duration,
    pub tick: Duration,
    pub probe_timeout: Duration,
    pub columns: usize,
    pub tuning: ProbeTuning,
}

impl Settings {
    pub fn resolve(cli: &Cli, file: &AppConfig) -> Result<Self> {
        let defaults = ProbeTuning::default();
        Ok(Self {
            interval: cli
                .interval
                .or(file_duration(&file.interval, "interval")?)
                .unwrap_or(DEFAULT_INTERVAL),
            tick: cli
                .tick
                .or(file_duration(&file.tick, "tick")?)
                .unwrap_or(DEFAULT_TICK),
            probe_timeout: cli
                .timeout
                .or(file_duration(&file.probe_timeout, "probe_timeout")?)
                .unwrap_or(DEFAULT_PROBE_TIMEOUT),
            columns: cli.columns.or(file.columns).unwrap_or(DEFAULT_COLUMNS).max(1),
            tuning: ProbeTuning {
                tree_depth: cli.depth.or(file.tree_depth).unwrap_or(defaults.tree_depth),
                tree_files: cli.files.or(file.tree_files).unwrap_or(defaults.tree_files),
            },
        })
    }

    /// The resolved settings as a config file payload, for `sysglance config`.
    pub fn to_file_config(&self) -> AppConfig {
        AppConfig {
            interval: Some(humantime::format_duration(self.interval).to_string()),
            tick: Some(humantime::format_duration(self.tick).to_string()),
            probe_timeout: Some(humantime::format_duration(self.probe_timeout).to_string()),
            columns: Some(self.columns),
            tree_depth: Some(self.tuning.tree_depth),
            tree_files: Some(self.tuning.tree_files),
        }
    }
}

fn file_duration(value: &Option<String>, key: &str) -> Result<Option<Duration>> {
    value
        .as_deref()
        .map(|v| {
            humantime::parse_duration(v)
                .with_context(|| format!("invalid {key} in config file: {v:?}"))
        })
        .transpose()
}

pub struct App {
    settings: Settings,
    registry: Arc<ProbeRegistry>,
    dashboard: Dashboard,
}

impl App {
    /// Fails fast on registry invariant violations, before any collection.
    pub fn new(settings: Settings) -> Result<Self> {
        let registry = probes::default_registry(settings.tuning)
            .context("failed to build probe registry")?;
        let dashboard = Dashboard::new(settings.columns);

        Ok(Self {
            settings,
            registry: Arc::new(registry),
            dashboard,
        })
    }

    pub fn registry(&self) -> &Arc<ProbeRegistry> {
        &self.registry
    }

    /// Run the refresh loop until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let collector = Collector::new(Arc::clone(&self.registry))
            .with_default_timeout(self.settings.probe_timeout);
        let (scheduler, mut snapshot_rx, first_rx) =
            Scheduler::new(collector, self.settings.interval);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let scheduler_handle = tokio::spawn(scheduler.run(shutdown_rx));

        let reporter = ProgressReporter::new(self.settings.tick);
        let mut progress_handle = Some(tokio::spawn(reporter.run(first_rx)));

        loop {
            tokio::select! {
                changed = snapshot_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let latest = snapshot_rx.borrow_and_update().clone();
                    if let Some(snapshot) = latest {
                        // The spinner clears itself on the first publish;
                        // wait for that before the first paint
                        if let Some(handle) = progress_handle.take() {
                            let _ = handle.await;
                        }
                        self.dashboard.render(&snapshot)?;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    let _ = shutdown_tx.send(true);
                    break;
                }
            }
        }

        // In-flight probes are detached; give the scheduler a moment to
        // observe shutdown, then exit regardless
        let _ = tokio::time::timeout(Duration::from_millis(250), scheduler_handle).await;
        println!();
        Ok(())
    }

    /// One collection cycle printed once, for scripting.
    pub async fn snapshot_once(self) -> Result<()> {
        let mut collector = Collector::new(Arc::clone(&self.registry))
            .with_default_timeout(self.settings.probe_timeout);

        let (first_tx, first_rx) = oneshot::channel();
        let reporter = ProgressReporter::new(self.settings.tick);
        let progress_handle = tokio::spawn(reporter.run(first_rx));

        let snapshot = collector.collect().await;
        let _ = first_tx.send(());
        let _ = progress_handle.await;

        self.dashboard.print(&snapshot)?;
        Ok(())
    }
}
