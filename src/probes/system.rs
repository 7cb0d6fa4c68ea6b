/// System information panel: identity, OS, cores, load, uptime, addresses.

use anyhow::Result;
use std::net::UdpSocket;
use std::process::Command;
use sysinfo::{System, Users};

use crate::utils::{format_duration, format_timestamp, two_column_table};

pub fn system_info() -> Result<String> {
    let mut sys = System::new();
    sys.refresh_cpu();
    sys.refresh_processes();

    let unknown = || "unknown".to_string();
    let mut rows: Vec<(String, String)> = vec![
        (
            "User".into(),
            std::env::var("USER").unwrap_or_else(|_| unknown()),
        ),
        ("Host Name".into(), System::host_name().unwrap_or_else(unknown)),
        ("Operating System".into(), System::name().unwrap_or_else(unknown)),
        ("OS Version".into(), System::os_version().unwrap_or_else(unknown)),
        ("Kernel".into(), System::kernel_version().unwrap_or_else(unknown)),
        ("Architecture".into(), System::cpu_arch().unwrap_or_else(unknown)),
        (
            "Boot Time".into(),
            format_timestamp(System::boot_time() as i64),
        ),
        ("Uptime".into(), format_duration(System::uptime())),
        (
            "Physical Cores".into(),
            sys.physical_core_count()
                .map(|n| n.to_string())
                .unwrap_or_else(unknown),
        ),
        ("Logical Cores".into(), sys.cpus().len().to_string()),
        ("Processes".into(), sys.processes().len().to_string()),
        (
            "Users".into(),
            Users::new_with_refreshed_list().list().len().to_string(),
        ),
    ];

    if let Some(cpu) = sys.cpus().first() {
        rows.push(("Processor".into(), cpu.brand().to_string()));
        rows.push(("Frequency".into(), format!("{} MHz", cpu.frequency())));
    }

    let load = System::load_average();
    rows.push((
        "Load Average".into(),
        format!("{:.2} {:.2} {:.2}", load.one, load.five, load.fifteen),
    ));

    rows.push(("Local IPv4".into(), local_ip()));
    rows.push((
        "Public IPv4".into(),
        public_ip(4).unwrap_or_else(|| "unavailable".to_string()),
    ));
    rows.push((
        "Public IPv6".into(),
        public_ip(6).unwrap_or_else(|| "unavailable".to_string()),
    ));

    Ok(two_column_table(&rows))
}

/// Local address via the UDP-connect trick; the target never has to be
/// reachable, the kernel just picks the outbound interface.
fn local_ip() -> String {
    UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("10.255.255.255:1")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| "127.0.0.1".to_string())
}

fn public_ip(version: u8) -> Option<String> {
    let flag = if version == 4 { "-4" } else { "-6" };
    let output = Command::new("curl")
        .args([flag, "-s", "--max-time", "2", "ifconfig.me"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let ip = String::from_utf8(output.stdout).ok()?.trim().to_string();
    // Sanity check: curl sometimes prints an HTML error page
    (!ip.is_empty() && ip.len() < 50).then_some(ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ip_is_parseable() {
        let ip: std::net::IpAddr = local_ip().parse().unwrap();
        assert!(ip.is_ipv4());
    }

    #[test]
    fn test_system_info_has_core_rows() {
        let table = system_info().unwrap();
        assert!(table.contains("Host Name"));
        assert!(table.contains("Logical Cores"));
        assert!(table.contains("Processes"));
        assert!(table.contains("Users"));
        assert!(table.contains("Load Average"));
    }
}
