/// Tiled panel renderer
///
/// Consumes a complete snapshot and tiles one titled panel per probe into
/// equal-width columns. Failed and timed-out probes render a marked
/// placeholder in their own panel; the rest of the dashboard is unaffected.

use std::io::{self, Write};

use anyhow::Result;
use colored::{Color, Colorize};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::core::{ProbeStatus, Snapshot};
use crate::utils::truncate_string;

const FALLBACK_TERM_WIDTH: usize = 120;
const TITLE_PALETTE: &[Color] = &[
    Color::Magenta,
    Color::Blue,
    Color::Yellow,
    Color::Red,
    Color::Cyan,
    Color::Green,
    Color::White,
];

pub struct Dashboard {
    columns: usize,
}

impl Dashboard {
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
        }
    }

    /// Clear the screen and repaint from the given snapshot.
    pub fn render(&self, snapshot: &Snapshot) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
        stdout.write_all(self.layout(snapshot, self.terminal_width()).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    /// Print without clearing, for one-shot output.
    pub fn print(&self, snapshot: &Snapshot) -> Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(self.layout(snapshot, self.terminal_width()).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn terminal_width(&self) -> usize {
        crossterm::terminal::size()
            .map(|(cols, _rows)| cols as usize)
            .unwrap_or(FALLBACK_TERM_WIDTH)
    }

    /// Tile panels row-major into `columns` cells of equal width; within a
    /// row every panel is padded to the tallest panel.
    pub fn layout(&self, snapshot: &Snapshot, term_width: usize) -> String {
        let cell_width = (term_width / self.columns).max(20);

        let mut out = String::new();
        out.push_str(&format!(
            "{} | {} | cycle {} | {} ok / {} degraded\n\n",
            "sysglance".bold(),
            snapshot.collected_at.format("%Y-%m-%d %H:%M:%S"),
            snapshot.cycle,
            snapshot.ok_count(),
            snapshot.degraded_count(),
        ));

        let panels: Vec<Vec<String>> = snapshot
            .results
            .iter()
            .enumerate()
            .map(|(idx, result)| self.panel_lines(idx, &result.name, &result.status))
            .collect();

        for row in panels.chunks(self.columns) {
            let height = row.iter().map(|p| p.len()).max().unwrap_or(0);
            for line_idx in 0..height {
                for panel in row {
                    let line = panel.get(line_idx).map(String::as_str).unwrap_or("");
                    out.push_str(&pad_cell(line, cell_width, line_idx == 0));
                }
                // Trailing pad spaces stay so rows stack as a clean grid
                out.push('\n');
            }
            out.push('\n');
        }

        out
    }

    fn panel_lines(&self, idx: usize, name: &str, status: &ProbeStatus) -> Vec<String> {
        let color = TITLE_PALETTE[idx % TITLE_PALETTE.len()];
        let mut lines = vec![format!("{}", panel_title(name).color(color).bold())];

        match status {
            ProbeStatus::Ok(payload) => {
                lines.extend(payload.lines().map(str::to_string));
            }
            ProbeStatus::Failed(reason) => {
                lines.push(format!("{}", "[probe failed]".red().bold()));
                lines.extend(reason.lines().map(str::to_string));
            }
            ProbeStatus::TimedOut => {
                lines.push(format!("{}", "[timed out]".yellow().bold()));
            }
        }

        lines
    }
}

/// Pad (or truncate) one cell line to the cell width, counting visible
/// characters so colored titles line up with plain body text.
fn pad_cell(line: &str, cell_width: usize, may_have_ansi: bool) -> String {
    let visible_len = if may_have_ansi {
        visible_width(line)
    } else {
        line.chars().count()
    };

    if visible_len > cell_width {
        if may_have_ansi && line.contains('\x1b') {
            return truncate_cell_ansi(line, cell_width);
        }
        return truncate_string(line, cell_width.saturating_sub(1)) + " ";
    }

    format!("{}{}", line, " ".repeat(cell_width - visible_len))
}

/// Truncate to the cell width counting only visible characters, keeping
/// escape sequences intact and closing the color before the ellipsis.
fn truncate_cell_ansi(line: &str, cell_width: usize) -> String {
    let keep = cell_width.saturating_sub(4);
    let mut out = String::new();
    let mut visible = 0;
    let mut in_escape = false;
    for c in line.chars() {
        if in_escape {
            out.push(c);
            if c == 'm' {
                in_escape = false;
            }
        } else if c == '\x1b' {
            in_escape = true;
            out.push(c);
        } else {
            if visible >= keep {
                break;
            }
            out.push(c);
            visible += 1;
        }
    }
    out.push_str("\x1b[0m... ");
    out
}

/// Character count ignoring ANSI color escapes.
fn visible_width(line: &str) -> usize {
    let mut count = 0;
    let mut in_escape = false;
    for c in line.chars() {
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else if c == '\x1b' {
            in_escape = true;
        } else {
            count += 1;
        }
    }
    count
}

/// Panel heading shown above each probe's output.
fn panel_title(name: &str) -> String {
    match name {
        "tree" => "Tree".to_string(),
        "system" => "System Information".to_string(),
        "processes" => "Processes (by CPU)".to_string(),
        "disk" => "Disk Information".to_string(),
        "gpu" => "GPU Information".to_string(),
        "ports" => "Open Ports".to_string(),
        "cpu-memory" => "CPU & Memory".to_string(),
        "speedtest" => "Network Speed".to_string(),
        "network" => "Network Health".to_string(),
        other => {
            // Title-case unknown probe names: "my-probe" -> "My Probe"
            other
                .split(['-', '_'])
                .filter(|part| !part.is_empty())
                .map(|part| {
                    let mut chars = part.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}
