//! File creation and loading for freechat configuration.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use super::paths::ConfigPaths;
use super::types::Settings;
use crate::constants::{DEFAULT_CONFIG_TOML, DEFAULT_PROMPTS_TOML};
use crate::prompts::PromptLibrary;

impl ConfigPaths {
    /// Creates the directory layout and any missing file with its defaults.
    ///
    /// Returns the settings/prompts files that had to be written. A non-empty
    /// result means this is a first run and credentials still need filling in.
    pub(super) fn ensure_layout(&self) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.sessions)
            .with_context(|| format!("Failed to create {:?}", self.sessions))?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.history)
            .with_context(|| format!("Failed to create {:?}", self.history))?;

        let mut created = Vec::new();
        for (path, contents) in [
            (&self.config, DEFAULT_CONFIG_TOML),
            (&self.prompts, DEFAULT_PROMPTS_TOML),
        ] {
            if !path.is_file() {
                fs::write(path, contents)
                    .with_context(|| format!("Failed to write default file to {:?}", path))?;
                tracing::debug!(path = %path.display(), "wrote default file");
                created.push(path.clone());
            }
        }
        Ok(created)
    }
}

/// Reads and parses the main settings file.
pub(super) fn read_settings(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;
    toml::from_str(&contents).with_context(|| format!("Invalid config file {:?}", path))
}

/// Reads and parses the prompt library. A missing file is an empty library.
pub(super) fn read_prompts(path: &Path) -> Result<PromptLibrary> {
    if !path.exists() {
        return Ok(PromptLibrary::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read prompts from {:?}", path))?;
    PromptLibrary::from_toml(&contents).with_context(|| format!("Invalid prompts file {:?}", path))
}
