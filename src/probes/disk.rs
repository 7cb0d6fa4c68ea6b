/// Disk panel: usage per mounted partition.

use anyhow::Result;
use sysinfo::Disks;

use crate::utils::format_bytes;

pub fn disk_info() -> Result<String> {
    let disks = Disks::new_with_refreshed_list();

    let mut out = String::new();
    for disk in disks.list() {
        let total = disk.total_space();
        let used = total.saturating_sub(disk.available_space());
        let percent = if total > 0 {
            used as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        out.push_str(&format!(
            "{}: {:.1}% used\n  {} out of {}\n  on {} ({})\n",
            disk.name().to_string_lossy(),
            percent,
            format_bytes(used),
            format_bytes(total),
            disk.mount_point().display(),
            disk.file_system().to_string_lossy(),
        ));
    }

    if out.is_empty() {
        out.push_str("no mounted partitions found\n");
    }

    Ok(out)
}
