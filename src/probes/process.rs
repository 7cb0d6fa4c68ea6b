/// Process panel: top processes by CPU usage.

use anyhow::Result;
use sysinfo::{System, Users, MINIMUM_CPU_UPDATE_INTERVAL};

use crate::utils::{aligned_table, truncate_string};

const TOP_PROCESSES: usize = 15;

pub fn processes_table() -> Result<String> {
    let mut sys = System::new_all();

    // Per-process CPU usage needs two samples
    std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_processes();

    let users = Users::new_with_refreshed_list();
    let memory_total = sys.total_memory().max(1);

    let mut processes: Vec<_> = sys.processes().values().collect();
    processes.sort_by(|a, b| {
        b.cpu_usage()
            .partial_cmp(&a.cpu_usage())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let rows: Vec<Vec<String>> = processes
        .iter()
        .take(TOP_PROCESSES)
        .map(|process| {
            let user = process
                .user_id()
                .and_then(|uid| users.get_user_by_id(uid))
                .map(|u| u.name().to_string())
                .unwrap_or_else(|| "-".to_string());
            vec![
                process.pid().to_string(),
                truncate_string(process.name(), 24),
                truncate_string(&user, 12),
                format!("{:.1}", process.cpu_usage()),
                format!(
                    "{:.1}",
                    process.memory() as f64 / memory_total as f64 * 100.0
                ),
            ]
        })
        .collect();

    Ok(aligned_table(&["PID", "Name", "User", "CPU %", "Mem %"], &rows))
}
