//! Configuration loading for freechat.
//!
//! Freechat keeps two TOML files in its config directory: `config.toml`
//! (default model, default prompt, provider credentials) and `prompts.toml`
//! (the system prompt library). Missing files are created with documented
//! defaults on first run.

mod loader;
mod paths;
mod resolve;
mod types;

pub use paths::ConfigPaths;
pub use types::{Credentials, Settings};

use anyhow::Result;
use std::path::PathBuf;

use crate::prompts::PromptLibrary;

/// Fully loaded configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub paths: ConfigPaths,
    pub settings: Settings,
    pub prompts: PromptLibrary,
}

/// Outcome of [`Config::load`].
#[derive(Debug)]
pub enum Loaded {
    /// Every file existed and parsed.
    Ready(Config),
    /// Default files were just written; the user must add credentials first.
    FirstRun(Vec<PathBuf>),
}

impl Config {
    /// Loads settings and prompts from `paths`, bootstrapping missing files.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory layout cannot be created or either
    /// file fails to parse.
    pub fn load(paths: ConfigPaths) -> Result<Loaded> {
        let created = paths.ensure_layout()?;
        if !created.is_empty() {
            return Ok(Loaded::FirstRun(created));
        }

        let mut settings = loader::read_settings(&paths.config)?;
        settings.resolve_substitutions();
        settings.apply_env_overrides();
        let prompts = loader::read_prompts(&paths.prompts)?;

        Ok(Loaded::Ready(Config {
            paths,
            settings,
            prompts,
        }))
    }
}
