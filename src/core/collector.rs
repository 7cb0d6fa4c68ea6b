/// Concurrent snapshot collector
///
/// Fans every due probe out onto the blocking thread pool, joins all of them,
/// and reassembles the results into registration order. One slow or failing
/// probe never delays or corrupts another probe's slot: each probe owns its
/// own result slot and nothing else is written during a cycle.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use futures::future::join_all;
use tokio::task::JoinError;

use super::probe::{ProbeRegistry, ProbeResult, ProbeStatus, Snapshot};

pub struct Collector {
    registry: Arc<ProbeRegistry>,
    /// Budget applied to probes that don't carry their own.
    default_timeout: Option<Duration>,
    cycle: u64,
    /// Last status per probe, reused on cycles where `refresh_every` says the
    /// probe is not due. Bounded by the registry size.
    cache: HashMap<String, ProbeStatus>,
}

impl Collector {
    pub fn new(registry: Arc<ProbeRegistry>) -> Self {
        Self {
            registry,
            default_timeout: None,
            cycle: 0,
            cache: HashMap::new(),
        }
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> &Arc<ProbeRegistry> {
        &self.registry
    }

    /// Run one full collection cycle. Returns only after every probe has
    /// reported Ok/Failed/TimedOut; completion order never leaks into the
    /// snapshot, which is always in registration order.
    pub async fn collect(&mut self) -> Snapshot {
        let cycle = self.cycle;
        let probe_count = self.registry.len();

        let mut slots: Vec<Option<ProbeStatus>> = vec![None; probe_count];
        let mut pending = Vec::new();

        for (idx, probe) in self.registry.probes().iter().enumerate() {
            // Cycle 0 runs everything so the first snapshot is complete.
            if cycle % probe.refresh_every != 0 {
                if let Some(cached) = self.cache.get(&probe.name) {
                    slots[idx] = Some(cached.clone());
                    continue;
                }
            }

            let run = Arc::clone(&probe.run);
            let budget = probe.timeout.or(self.default_timeout);
            pending.push(async move {
                let handle = tokio::task::spawn_blocking(move || run());
                let status = match budget {
                    Some(budget) => match tokio::time::timeout(budget, handle).await {
                        Ok(joined) => status_from_join(joined),
                        // Dropping the JoinHandle detaches the blocking task:
                        // a hung subprocess finishes (or leaks) in the
                        // background without pinning this cycle or shutdown.
                        Err(_) => ProbeStatus::TimedOut,
                    },
                    None => status_from_join(handle.await),
                };
                (idx, status)
            });
        }

        for (idx, status) in join_all(pending).await {
            slots[idx] = Some(status);
        }

        let mut results = Vec::with_capacity(probe_count);
        for (probe, status) in self.registry.probes().iter().zip(slots) {
            // Every probe either ran this cycle or was served from cache.
            let status = status.unwrap_or(ProbeStatus::TimedOut);
            self.cache.insert(probe.name.clone(), status.clone());
            results.push(ProbeResult {
                name: probe.name.clone(),
                status,
            });
        }

        self.cycle += 1;

        Snapshot {
            results,
            collected_at: Local::now(),
            cycle,
        }
    }
}

fn status_from_join(joined: Result<anyhow::Result<String>, JoinError>) -> ProbeStatus {
    match joined {
        Ok(Ok(payload)) => ProbeStatus::Ok(payload),
        Ok(Err(err)) => ProbeStatus::Failed(format!("{err:#}")),
        Err(join_err) if join_err.is_panic() => ProbeStatus::Failed("probe panicked".to_string()),
        Err(join_err) => ProbeStatus::Failed(format!("probe task aborted: {join_err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::probe::ProbeDescriptor;
    use anyhow::anyhow;
    use std::time::Instant;

    fn registry(probes: Vec<ProbeDescriptor>) -> Arc<ProbeRegistry> {
        let mut registry = ProbeRegistry::new();
        for probe in probes {
            registry.register(probe).unwrap();
        }
        Arc::new(registry)
    }

    #[tokio::test]
    async fn test_results_in_registration_order_despite_completion_order() {
        // Latencies are reversed relative to registration order: the first
        // registered probe finishes last.
        let registry = registry(vec![
            ProbeDescriptor::new("slow", || {
                std::thread::sleep(Duration::from_millis(80));
                Ok("slow".to_string())
            }),
            ProbeDescriptor::new("medium", || {
                std::thread::sleep(Duration::from_millis(40));
                Ok("medium".to_string())
            }),
            ProbeDescriptor::new("fast", || Ok("fast".to_string())),
        ]);

        let snapshot = Collector::new(registry).collect().await;

        let names: Vec<&str> = snapshot.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["slow", "medium", "fast"]);
        assert_eq!(snapshot.ok_count(), 3);
    }

    #[tokio::test]
    async fn test_failing_probe_is_isolated() {
        let registry = registry(vec![
            ProbeDescriptor::new("good-1", || Ok("one".to_string())),
            ProbeDescriptor::new("bad", || Err(anyhow!("permission denied"))),
            ProbeDescriptor::new("good-2", || Ok("two".to_string())),
        ]);

        let snapshot = Collector::new(registry).collect().await;

        assert_eq!(snapshot.results.len(), 3);
        assert_eq!(snapshot.ok_count(), 2);
        match &snapshot.get("bad").unwrap().status {
            ProbeStatus::Failed(reason) => assert!(reason.contains("permission denied")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_panicking_probe_reports_failed() {
        let registry = registry(vec![
            ProbeDescriptor::new("steady", || Ok("ok".to_string())),
            ProbeDescriptor::new("explosive", || panic!("boom")),
        ]);

        let snapshot = Collector::new(registry).collect().await;

        assert!(snapshot.get("steady").unwrap().status.is_ok());
        assert_eq!(
            snapshot.get("explosive").unwrap().status,
            ProbeStatus::Failed("probe panicked".to_string())
        );
    }

    #[tokio::test]
    async fn test_timeout_bounds_collection_not_probe_runtime() {
        let registry = registry(vec![ProbeDescriptor::new("hung", || {
            std::thread::sleep(Duration::from_secs(10));
            Ok("too late".to_string())
        })
        .with_timeout(Duration::from_millis(200))]);

        let started = Instant::now();
        let snapshot = Collector::new(registry).collect().await;
        let elapsed = started.elapsed();

        assert_eq!(snapshot.get("hung").unwrap().status, ProbeStatus::TimedOut);
        // Bounded by timeout + scheduling overhead, not the 10s sleep
        assert!(
            elapsed < Duration::from_secs(1),
            "collect took {elapsed:?}, expected ~200ms"
        );
    }

    #[tokio::test]
    async fn test_mixed_scenario_ok_failed_timed_out() {
        let registry = registry(vec![
            ProbeDescriptor::new("a", || {
                std::thread::sleep(Duration::from_millis(10));
                Ok("ok-A".to_string())
            }),
            ProbeDescriptor::new("b", || Err(anyhow!("broken"))),
            ProbeDescriptor::new("c", || {
                std::thread::sleep(Duration::from_millis(500));
                Ok("never seen".to_string())
            })
            .with_timeout(Duration::from_millis(100)),
        ]);

        let started = Instant::now();
        let snapshot = Collector::new(registry).collect().await;
        let elapsed = started.elapsed();

        assert!(snapshot.get("a").unwrap().status.is_ok());
        assert!(matches!(
            snapshot.get("b").unwrap().status,
            ProbeStatus::Failed(_)
        ));
        assert_eq!(snapshot.get("c").unwrap().status, ProbeStatus::TimedOut);
        assert!(
            elapsed < Duration::from_millis(450),
            "collect took {elapsed:?}, expected ~110ms"
        );
    }

    #[tokio::test]
    async fn test_default_timeout_applies_when_probe_has_none() {
        let registry = registry(vec![ProbeDescriptor::new("hung", || {
            std::thread::sleep(Duration::from_secs(10));
            Ok(String::new())
        })]);

        let snapshot = Collector::new(registry)
            .with_default_timeout(Duration::from_millis(100))
            .collect()
            .await;

        assert_eq!(snapshot.get("hung").unwrap().status, ProbeStatus::TimedOut);
    }

    #[tokio::test]
    async fn test_refresh_every_serves_cache_between_reruns() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let runs = Arc::new(AtomicUsize::new(0));
        let runs_probe = Arc::clone(&runs);
        let registry = registry(vec![ProbeDescriptor::new("expensive", move || {
            let n = runs_probe.fetch_add(1, Ordering::SeqCst);
            Ok(format!("run-{n}"))
        })
        .with_refresh_every(3)]);

        let mut collector = Collector::new(registry);

        // Cycle 0 always runs; cycles 1 and 2 reuse; cycle 3 reruns.
        let expected = ["run-0", "run-0", "run-0", "run-1"];
        for want in expected {
            let snapshot = collector.collect().await;
            assert_eq!(
                snapshot.get("expensive").unwrap().status,
                ProbeStatus::Ok(want.to_string())
            );
        }
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_registry_yields_empty_snapshot() {
        let snapshot = Collector::new(Arc::new(ProbeRegistry::new())).collect().await;
        assert!(snapshot.results.is_empty());
        assert_eq!(snapshot.cycle, 0);
    }
}
