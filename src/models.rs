//! Cache of available models per provider.
//!
//! Filled once by the startup listing fan-out and read-only afterwards. The
//! REPL uses it for tab completion and the `models` subcommand prints it.

use std::collections::BTreeMap;

/// Provider name → sorted model ids.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    by_provider: BTreeMap<String, Vec<String>>,
}

impl ModelCatalog {
    pub fn insert(&mut self, provider: impl Into<String>, models: Vec<String>) {
        self.by_provider.insert(provider.into(), models);
    }

    #[cfg(test)]
    pub fn models(&self, provider: &str) -> &[String] {
        self.by_provider
            .get(provider)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_provider
            .iter()
            .map(|(p, m)| (p.as_str(), m.as_slice()))
    }

    /// Every model as a full `provider/model` identifier.
    pub fn qualified_ids(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(provider, models)| models.iter().map(move |m| format!("{provider}/{m}")))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.by_provider.values().map(Vec::len).sum()
    }
}
