/// Helper utilities for sysglance

use chrono::{DateTime, Local};

/// Format bytes to human-readable size
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Format duration to human-readable string
pub fn format_duration(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Format a unix timestamp to local date-time
pub fn format_timestamp(timestamp: i64) -> String {
    let dt = DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap());
    let local: DateTime<Local> = dt.into();
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Truncate string with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Render label/value rows as an aligned two-column block, the panel
/// equivalent of the original's grid tables.
pub fn two_column_table(rows: &[(String, String)]) -> String {
    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, value) in rows {
        out.push_str(&format!("{:<width$}  {}\n", label, value, width = label_width));
    }
    out
}

/// Render header + rows with every column padded to its widest cell.
pub fn aligned_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().take(columns).enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let render_row = |cells: &[String]| -> String {
        let mut line = String::new();
        for (i, cell) in cells.iter().take(columns).enumerate() {
            line.push_str(&format!("{:<width$}", cell, width = widths[i]));
            if i + 1 < columns {
                line.push_str("  ");
            }
        }
        line.trim_end().to_string()
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = render_row(&header_cells);
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + columns.saturating_sub(1) * 2));
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
        assert_eq!(format_bytes(1073741824), "1.00 GB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30), "30s");
        assert_eq!(format_duration(90), "1m 30s");
        assert_eq!(format_duration(3661), "1h 1m");
        assert_eq!(format_duration(86400), "1d 0h");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a-very-long-name", 10), "a-very-...");
    }

    #[test]
    fn test_two_column_table_aligns_labels() {
        let rows = vec![
            ("User".to_string(), "merlin".to_string()),
            ("Operating System".to_string(), "Linux".to_string()),
        ];
        let table = two_column_table(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "User              merlin");
        assert_eq!(lines[1], "Operating System  Linux");
    }

    #[test]
    fn test_aligned_table_pads_columns() {
        let rows = vec![
            vec!["1".to_string(), "systemd".to_string()],
            vec!["4242".to_string(), "sh".to_string()],
        ];
        let table = aligned_table(&["PID", "Name"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "PID   Name");
        assert_eq!(lines[2], "1     systemd");
        assert_eq!(lines[3], "4242  sh");
    }
}
