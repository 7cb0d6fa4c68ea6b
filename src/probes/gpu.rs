/// GPU panel: per-device load, temperature and memory from nvidia-smi.
/// Hosts without an NVIDIA driver report a Failed panel, not a crash.

use anyhow::{bail, Context, Result};
use std::process::Command;

const QUERY_FIELDS: &str = "name,utilization.gpu,temperature.gpu,memory.used,memory.total,driver_version,uuid";

pub fn gpu_info() -> Result<String> {
    let output = Command::new("nvidia-smi")
        .arg(format!("--query-gpu={QUERY_FIELDS}"))
        .arg("--format=csv,noheader,nounits")
        .output()
        .context("nvidia-smi not available")?;

    if !output.status.success() {
        bail!(
            "nvidia-smi failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report = parse_query_output(&stdout)?;
    Ok(report)
}

fn parse_query_output(csv: &str) -> Result<String> {
    let mut out = String::new();
    for line in csv.lines().filter(|l| !l.trim().is_empty()) {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 7 {
            bail!("unexpected nvidia-smi output: {line}");
        }
        out.push_str(&format!(
            "GPU: {}\nLoad: {}%\nTemperature: {} C\nMemory Used: {}/{} MB\nDriver: {}\nUUID: {}\n",
            fields[0], fields[1], fields[2], fields[3], fields[4], fields[5], fields[6],
        ));
    }

    if out.is_empty() {
        bail!("no GPUs reported");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_gpu() {
        let csv = "NVIDIA GeForce RTX 3080, 37, 54, 2048, 10240, 535.54.03, GPU-deadbeef\n";
        let report = parse_query_output(csv).unwrap();
        assert!(report.contains("GPU: NVIDIA GeForce RTX 3080"));
        assert!(report.contains("Load: 37%"));
        assert!(report.contains("Memory Used: 2048/10240 MB"));
    }

    #[test]
    fn test_parse_empty_output_fails() {
        assert!(parse_query_output("").is_err());
    }

    #[test]
    fn test_parse_malformed_line_fails() {
        assert!(parse_query_output("garbage,line").is_err());
    }
}
