/// Built-in probes
///
/// Each probe is an independent blocking function over local system state;
/// no probe depends on another probe's output. Registration order here is
/// the panel order of every snapshot.

pub mod cpu_mem;
pub mod disk;
pub mod gpu;
pub mod network;
pub mod ports;
pub mod process;
pub mod system;
pub mod tree;

use std::time::Duration;

use crate::core::{ProbeDescriptor, ProbeRegistry, RegistryError};

/// Tuning for the probes that take parameters.
#[derive(Debug, Clone, Copy)]
pub struct ProbeTuning {
    pub tree_depth: usize,
    pub tree_files: usize,
}

impl Default for ProbeTuning {
    fn default() -> Self {
        Self {
            tree_depth: 2,
            tree_files: 5,
        }
    }
}

/// Build the standard dashboard registry. Subprocess-bound probes carry
/// their own budgets; the rest inherit the collector default. Expensive,
/// slow-changing probes rerun every Nth cycle instead of every cycle.
pub fn default_registry(tuning: ProbeTuning) -> Result<ProbeRegistry, RegistryError> {
    let mut registry = ProbeRegistry::new();

    let ProbeTuning {
        tree_depth,
        tree_files,
    } = tuning;
    registry.register(
        ProbeDescriptor::new("tree", move || tree::home_tree(tree_depth, tree_files))
            .with_refresh_every(10),
    )?;

    registry.register(ProbeDescriptor::new("system", system::system_info))?;
    registry.register(ProbeDescriptor::new("processes", process::processes_table))?;
    registry.register(ProbeDescriptor::new("disk", disk::disk_info))?;

    registry.register(
        ProbeDescriptor::new("gpu", gpu::gpu_info).with_timeout(Duration::from_secs(5)),
    )?;

    // Full range at 25ms per closed port can add up; give it headroom and
    // rescan only every few cycles
    registry.register(
        ProbeDescriptor::new("ports", ports::open_ports)
            .with_timeout(Duration::from_secs(60))
            .with_refresh_every(5),
    )?;

    registry.register(ProbeDescriptor::new("cpu-memory", cpu_mem::cpu_memory_table))?;

    registry.register(
        ProbeDescriptor::new("speedtest", network::speed_test)
            .with_timeout(Duration::from_secs(45))
            .with_refresh_every(20),
    )?;

    registry.register(ProbeDescriptor::new("network", network::network_health))?;

    Ok(registry)
}
