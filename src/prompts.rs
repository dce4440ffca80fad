//! Reusable system prompts loaded from `prompts.toml`.
//!
//! Each top-level table is one prompt:
//!
//! ```toml
//! [coder]
//! prompt = """You are an expert programmer."""
//! ```

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;

/// A single entry of the prompt library.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptEntry {
    pub prompt: Option<String>,
}

/// Named system prompts, ordered by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PromptLibrary {
    entries: BTreeMap<String, PromptEntry>,
}

impl PromptLibrary {
    /// Parses a prompt library from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse prompt library")
    }

    /// Returns the prompt text for `name`, if the entry exists and has one.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|e| e.prompt.as_deref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Name and first line of every prompt, for listings.
    pub fn previews(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .map(|(name, entry)| {
                let preview = entry
                    .prompt
                    .as_deref()
                    .map(|p| p.lines().next().unwrap_or(""))
                    .unwrap_or("N/A");
                (name.as_str(), preview)
            })
            .collect()
    }
}
