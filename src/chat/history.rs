//! Plain-text input history: one submitted line per file line.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

/// Header rustyline writes into its own history files.
const LEGACY_HEADER: &str = "#V2";

/// Reads history entries, oldest first. Blank lines are skipped.
pub fn load(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read history {}", path.display()))?;
    Ok(contents
        .lines()
        .filter(|line| !line.trim().is_empty() && *line != LEGACY_HEADER)
        .map(str::to_string)
        .collect())
}

/// Appends `entry` as one line, creating the file if needed.
pub fn append(path: &Path, entry: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open history {}", path.display()))?;
    writeln!(file, "{entry}")
        .with_context(|| format!("failed to write history {}", path.display()))
}
