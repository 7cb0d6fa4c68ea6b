/// Refresh scheduler
///
/// Drives the collector on a fixed cadence and owns publication of the
/// current snapshot. The published slot is a `tokio::sync::watch` channel:
/// one writer, any number of readers, readers only ever observe a
/// fully-formed `Arc<Snapshot>` swapped in atomically.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};

use super::collector::Collector;
use super::probe::Snapshot;

pub type SnapshotRx = watch::Receiver<Option<Arc<Snapshot>>>;

pub struct Scheduler {
    collector: Collector,
    interval: Duration,
    snapshot_tx: watch::Sender<Option<Arc<Snapshot>>>,
    /// Fired once, after the first publish; stops the progress reporter.
    first_publish_tx: Option<oneshot::Sender<()>>,
}

impl Scheduler {
    /// Returns the scheduler plus the reader side of the published-snapshot
    /// slot and the first-publish signal.
    pub fn new(
        collector: Collector,
        interval: Duration,
    ) -> (Self, SnapshotRx, oneshot::Receiver<()>) {
        let (snapshot_tx, snapshot_rx) = watch::channel(None);
        let (first_publish_tx, first_publish_rx) = oneshot::channel();

        let scheduler = Self {
            collector,
            interval,
            snapshot_tx,
            first_publish_tx: Some(first_publish_tx),
        };

        (scheduler, snapshot_rx, first_publish_rx)
    }

    /// Collect → publish → sleep, until shutdown. A shutdown request never
    /// starts another cycle; in-flight probes are abandoned (their blocking
    /// tasks are already detached, so nothing can deadlock exit).
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                break;
            }

            let snapshot = tokio::select! {
                snapshot = self.collector.collect() => snapshot,
                _ = shutdown.changed() => break,
            };

            // A cycle where every probe failed or timed out is still a valid,
            // complete snapshot and is published like any other.
            let _ = self.snapshot_tx.send(Some(Arc::new(snapshot)));
            if let Some(tx) = self.first_publish_tx.take() {
                let _ = tx.send(());
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::probe::{ProbeDescriptor, ProbeRegistry, ProbeStatus};
    use anyhow::anyhow;

    fn collector(probes: Vec<ProbeDescriptor>) -> Collector {
        let mut registry = ProbeRegistry::new();
        for probe in probes {
            registry.register(probe).unwrap();
        }
        Collector::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_publishes_first_snapshot_and_signals_once() {
        let collector = collector(vec![ProbeDescriptor::new("fast", || Ok("ok".to_string()))]);
        let (scheduler, mut snapshot_rx, first_rx) =
            Scheduler::new(collector, Duration::from_millis(20));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(scheduler.run(shutdown_rx));

        snapshot_rx.changed().await.unwrap();
        let snapshot = snapshot_rx.borrow_and_update().clone().unwrap();
        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(snapshot.cycle, 0);

        // First-publish signal fires exactly when the first snapshot lands
        tokio::time::timeout(Duration::from_millis(100), first_rx)
            .await
            .expect("first-publish signal not fired")
            .unwrap();

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("scheduler did not stop on shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn test_all_failed_cycle_still_publishes() {
        let collector = collector(vec![
            ProbeDescriptor::new("bad-1", || Err(anyhow!("down"))),
            ProbeDescriptor::new("bad-2", || Err(anyhow!("also down"))),
        ]);
        let (scheduler, mut snapshot_rx, _first_rx) =
            Scheduler::new(collector, Duration::from_millis(20));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(scheduler.run(shutdown_rx));

        snapshot_rx.changed().await.unwrap();
        let snapshot = snapshot_rx.borrow_and_update().clone().unwrap();
        assert_eq!(snapshot.results.len(), 2);
        assert_eq!(snapshot.ok_count(), 0);
        assert!(snapshot
            .results
            .iter()
            .all(|r| matches!(r.status, ProbeStatus::Failed(_))));

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_recollects_on_cadence() {
        let collector = collector(vec![ProbeDescriptor::new("tick", || Ok("t".to_string()))]);
        let (scheduler, mut snapshot_rx, _first_rx) =
            Scheduler::new(collector, Duration::from_millis(10));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(scheduler.run(shutdown_rx));

        snapshot_rx.changed().await.unwrap();
        let first = snapshot_rx.borrow_and_update().clone().unwrap().cycle;
        snapshot_rx.changed().await.unwrap();
        let second = snapshot_rx.borrow_and_update().clone().unwrap().cycle;
        assert!(second > first);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_no_new_cycle_after_shutdown() {
        let collector = collector(vec![ProbeDescriptor::new("tick", || Ok("t".to_string()))]);
        let (scheduler, mut snapshot_rx, _first_rx) =
            Scheduler::new(collector, Duration::from_millis(10));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(scheduler.run(shutdown_rx));

        snapshot_rx.changed().await.unwrap();
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        // Writer side is gone, so no further publish can ever arrive
        assert!(snapshot_rx.changed().await.is_err());
    }
}
