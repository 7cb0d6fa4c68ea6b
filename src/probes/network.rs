/// Network panels: interface byte counters + established connections, and
/// the speedtest-cli bandwidth measurement.

use anyhow::{bail, Context, Result};
use std::process::Command;
use sysinfo::Networks;

use crate::utils::format_bytes;

const MAX_CONNECTIONS_SHOWN: usize = 25;

/// Byte counters across all interfaces plus a bounded list of established
/// TCP connections.
pub fn network_health() -> Result<String> {
    let networks = Networks::new_with_refreshed_list();
    let (mut sent, mut received) = (0u64, 0u64);
    for (_name, data) in networks.iter() {
        sent += data.total_transmitted();
        received += data.total_received();
    }

    let mut out = String::new();
    out.push_str(&format!("Sent: {}\n", format_bytes(sent)));
    out.push_str(&format!("Received: {}\n", format_bytes(received)));

    let connections = established_connections().unwrap_or_default();
    out.push_str(&format!(
        "Connections: {} (showing up to {})\n",
        connections.len(),
        MAX_CONNECTIONS_SHOWN
    ));
    for conn in connections.iter().take(MAX_CONNECTIONS_SHOWN) {
        out.push_str(conn);
        out.push('\n');
    }

    Ok(out)
}

/// Run speedtest-cli. Expensive and unbounded without the per-probe timeout
/// set at registration.
pub fn speed_test() -> Result<String> {
    let output = Command::new("speedtest-cli")
        .arg("--simple")
        .output()
        .context("speedtest-cli not available")?;

    if !output.status.success() {
        bail!(
            "speedtest-cli failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn established_connections() -> Option<Vec<String>> {
    let output = Command::new("ss")
        .args(["-tn", "state", "established"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(parse_ss_connections(&String::from_utf8_lossy(&output.stdout)))
}

/// Last two columns of each `ss -tn` row are local and peer address.
fn parse_ss_connections(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [.., local, peer] if local.contains(':') && peer.contains(':') => {
                    Some(format!("{local} -> {peer}"))
                }
                _ => None,
            }
        })
        .collect()
}
