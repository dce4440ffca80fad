//! Construction and lookup of configured providers.

use std::collections::BTreeMap;

use anyhow::Result;
use futures::future::join_all;

use super::client::{http_client, Provider};
use super::kind::ProviderKind;
use super::resolve::ModelId;
use crate::config::Credentials;
use crate::models::ModelCatalog;

/// Every provider that has a credential, keyed by routing name.
pub struct ProviderFactory {
    providers: BTreeMap<String, Provider>,
}

impl ProviderFactory {
    /// Builds one provider per configured credential.
    ///
    /// Providers without a key are simply absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        let http = http_client()?;
        let mut providers = BTreeMap::new();
        for kind in ProviderKind::ALL {
            let Some(key) = credentials.api_key(kind.name()) else {
                continue;
            };
            let base_url = credentials
                .base_url(kind.name())
                .unwrap_or(kind.default_base_url());
            providers.insert(
                kind.name().to_string(),
                Provider::new(kind, key, base_url, http.clone()),
            );
        }
        Ok(Self { providers })
    }

    /// Resolves `provider/model` to the provider and the verbatim model segment.
    ///
    /// The provider segment is case-insensitive. Returns `None` for malformed
    /// ids and unconfigured providers.
    pub fn resolve<'a, 'b>(&'a self, model_id: &'b str) -> Option<(&'a Provider, &'b str)> {
        let id = ModelId::parse(model_id)?;
        let kind = ProviderKind::from_name(id.provider)?;
        let provider = self.providers.get(kind.name())?;
        Some((provider, id.model))
    }

    /// Names of configured providers, sorted.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Lists every provider's models concurrently.
    ///
    /// Each listing succeeds or fails on its own; a failed provider
    /// contributes an empty list.
    pub async fn fetch_models(&mut self) -> ModelCatalog {
        let listings = join_all(self.providers.values_mut().map(|p| p.get_models())).await;
        let mut catalog = ModelCatalog::default();
        for (provider, models) in listings {
            catalog.insert(provider, models);
        }
        catalog
    }

    #[cfg(test)]
    pub(crate) fn get_mut(&mut self, provider: &str) -> Option<&mut Provider> {
        self.providers.get_mut(provider)
    }
}
