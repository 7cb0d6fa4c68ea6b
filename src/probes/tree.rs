/// Directory-tree panel: depth-limited walk of the home directory, largest
/// files first, truncated per directory with a `#####` marker.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::utils::format_bytes;

const INDENT: &str = "    ";

pub fn home_tree(depth: usize, file_limit: usize) -> Result<String> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    directory_tree(&home, depth, file_limit)
}

pub fn directory_tree(root: &Path, depth: usize, file_limit: usize) -> Result<String> {
    let mut out = String::new();
    render_dir(&mut out, root, 0, depth, file_limit)?;
    Ok(out)
}

fn render_dir(
    out: &mut String,
    dir: &Path,
    level: usize,
    depth: usize,
    file_limit: usize,
) -> Result<()> {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    out.push_str(&format!("{}{}/\n", INDENT.repeat(level), name));

    // Unreadable directories just end the branch
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(()),
    };

    let mut files: Vec<(String, u64)> = Vec::new();
    let mut subdirs: Vec<std::path::PathBuf> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        match entry.metadata() {
            Ok(meta) if meta.is_dir() => subdirs.push(path),
            Ok(meta) if meta.is_file() => {
                files.push((entry.file_name().to_string_lossy().into_owned(), meta.len()));
            }
            _ => {}
        }
    }

    // Largest files first, bounded per directory
    files.sort_by(|a, b| b.1.cmp(&a.1));
    let subindent = INDENT.repeat(level + 1);
    for (i, (file, size)) in files.iter().enumerate() {
        if i >= file_limit {
            out.push_str(&format!("{}|-- #####\n", subindent));
            break;
        }
        out.push_str(&format!("{}|-- {} ({})\n", subindent, file, format_bytes(*size)));
    }

    if level < depth {
        subdirs.sort();
        for subdir in subdirs {
            render_dir(out, &subdir, level + 1, depth, file_limit)?;
        }
    }

    Ok(())
}
