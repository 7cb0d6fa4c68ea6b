/// CPU & memory panel: overall and per-core usage, memory totals.

use anyhow::Result;
use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};

use crate::utils::{format_bytes, two_column_table};

pub fn cpu_memory_table() -> Result<String> {
    let mut sys = System::new();
    sys.refresh_memory();

    // CPU usage is a delta; two refreshes a tick apart are required
    sys.refresh_cpu();
    std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu();

    let memory_total = sys.total_memory();
    let memory_used = sys.used_memory();
    let memory_percent = if memory_total > 0 {
        memory_used as f64 / memory_total as f64 * 100.0
    } else {
        0.0
    };

    let mut rows: Vec<(String, String)> = vec![
        (
            "Overall CPU Usage".into(),
            format!("{:.1}%", sys.global_cpu_info().cpu_usage()),
        ),
        ("Total Memory".into(), format_bytes(memory_total)),
        ("Memory Used".into(), format_bytes(memory_used)),
        ("Memory Usage".into(), format!("{:.1}%", memory_percent)),
    ];

    for (i, cpu) in sys.cpus().iter().enumerate() {
        rows.push((format!("CPU Core {}", i + 1), format!("{:.1}%", cpu.cpu_usage())));
    }

    Ok(two_column_table(&rows))
}
