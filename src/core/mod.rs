pub mod collector;
pub mod probe;
pub mod progress;
pub mod scheduler;

pub use collector::Collector;
pub use probe::{
    ProbeDescriptor, ProbeRegistry, ProbeResult, ProbeStatus, RegistryError, Snapshot,
};
pub use progress::ProgressReporter;
pub use scheduler::{Scheduler, SnapshotRx};
