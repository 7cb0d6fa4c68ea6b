/// Probe abstraction and registry
///
/// A probe is a named, independent unit of telemetry collection. Probes are
/// registered once at startup; registration order is the order their panels
/// appear in every snapshot.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use thiserror::Error;

/// Probe bodies are blocking (subprocess calls, socket scans, /proc reads),
/// so the collector runs them on the blocking thread pool.
pub type ProbeFn = Arc<dyn Fn() -> anyhow::Result<String> + Send + Sync>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate probe name: {0}")]
    DuplicateProbeName(String),
}

/// Immutable description of one probe. Created at startup, lives for the
/// process lifetime.
#[derive(Clone)]
pub struct ProbeDescriptor {
    pub name: String,
    pub run: ProbeFn,
    /// Per-probe budget; probes without one inherit the collector default.
    pub timeout: Option<Duration>,
    /// Rerun the probe every N cycles; intermediate cycles reuse the last
    /// result. 1 = fresh every cycle.
    pub refresh_every: u64,
}

impl ProbeDescriptor {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn() -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: Arc::new(run),
            timeout: None,
            refresh_every: 1,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_refresh_every(mut self, cycles: u64) -> Self {
        self.refresh_every = cycles.max(1);
        self
    }
}

impl std::fmt::Debug for ProbeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeDescriptor")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .field("refresh_every", &self.refresh_every)
            .finish()
    }
}

/// Outcome of one probe in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    Ok(String),
    Failed(String),
    TimedOut,
}

impl ProbeStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ProbeStatus::Ok(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub name: String,
    pub status: ProbeStatus,
}

/// One complete collection cycle: exactly one result per registered probe,
/// in registration order. Immutable once constructed; shared between the
/// scheduler and readers as `Arc<Snapshot>`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub results: Vec<ProbeResult>,
    pub collected_at: DateTime<Local>,
    pub cycle: u64,
}

impl Snapshot {
    pub fn ok_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_ok()).count()
    }

    pub fn degraded_count(&self) -> usize {
        self.results.len() - self.ok_count()
    }

    pub fn get(&self, name: &str) -> Option<&ProbeResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

/// Ordered set of probes. Read-only once collection begins (the collector
/// takes it behind an `Arc`).
#[derive(Default)]
pub struct ProbeRegistry {
    probes: Vec<ProbeDescriptor>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a probe. Fails fast if the name is already taken; no two panels
    /// may share a name.
    pub fn register(&mut self, probe: ProbeDescriptor) -> Result<(), RegistryError> {
        if self.probes.iter().any(|p| p.name == probe.name) {
            return Err(RegistryError::DuplicateProbeName(probe.name));
        }
        self.probes.push(probe);
        Ok(())
    }

    pub fn probes(&self) -> &[ProbeDescriptor] {
        &self.probes
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}
