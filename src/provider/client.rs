//! LLM provider client and streaming implementation.
//!
//! Contains the [`Provider`] struct which wraps one remote backend behind
//! enum dispatch, keeping wire-protocol details out of the chat layer. Every
//! backend exposes the same three capabilities: list models, stream a chat
//! completion, and price a call.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::stream::{BoxStream, StreamExt, TryStreamExt};

use super::error::{check_status, ProviderError};
use super::gemini;
use super::kind::ProviderKind;
use super::openai;
use super::pricing::{self, PriceTable};
use crate::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use crate::message::Message;

/// Lazy, finite stream of response text fragments.
///
/// Dropping it closes the underlying HTTP response.
pub type ChatStream = BoxStream<'static, Result<String, ProviderError>>;

/// Internal enum selecting the wire protocol.
enum Backend {
    /// OpenAI and OpenRouter share the chat-completions protocol.
    OpenAiCompatible { prices: PriceTable },
    Gemini,
}

/// A configured LLM provider ready to handle requests.
pub struct Provider {
    kind: ProviderKind,
    backend: Backend,
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

/// Builds the HTTP client shared by all providers.
///
/// # Errors
///
/// Returns an error if the TLS backend fails to initialize.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .read_timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .build()
        .context("Failed to create HTTP client")
}

impl Provider {
    /// Creates a provider for `kind` talking to `base_url`.
    pub fn new(
        kind: ProviderKind,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        let backend = match kind {
            ProviderKind::OpenAI | ProviderKind::OpenRouter => Backend::OpenAiCompatible {
                prices: PriceTable::new(),
            },
            ProviderKind::Gemini => Backend::Gemini,
        };
        Self {
            kind,
            backend,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Display and routing name (`openai`, `openrouter`, `gemini`).
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Lists the backend's models as `(provider_name, sorted ids)`.
    ///
    /// Never fails: any error is logged as a warning and yields an empty
    /// list. OpenRouter listings also refresh the price table.
    pub async fn get_models(&mut self) -> (String, Vec<String>) {
        let name = self.name().to_string();
        if self.api_key.is_empty() {
            return (name, Vec::new());
        }
        match self.fetch_models().await {
            Ok(mut models) => {
                models.sort();
                tracing::debug!(provider = %name, count = models.len(), "listed models");
                (name, models)
            }
            Err(e) => {
                tracing::warn!(provider = %name, "failed to fetch models: {e}");
                (name, Vec::new())
            }
        }
    }

    async fn fetch_models(&mut self) -> Result<Vec<String>, ProviderError> {
        match &mut self.backend {
            Backend::OpenAiCompatible { prices } => {
                let response = self
                    .http
                    .get(format!("{}/models", self.base_url))
                    .bearer_auth(&self.api_key)
                    .send()
                    .await?;
                let list: openai::ModelList = check_status(response).await?.json().await?;
                if self.kind.lists_prices() {
                    *prices = list.prices();
                }
                Ok(list.ids())
            }
            Backend::Gemini => {
                let response = self
                    .http
                    .get(&self.base_url)
                    .query(&[("key", self.api_key.as_str()), ("pageSize", "1000")])
                    .send()
                    .await?;
                let list: gemini::ModelList = check_status(response).await?.json().await?;
                Ok(list.ids())
            }
        }
    }

    /// Streams a chat completion for `messages` from `model`.
    ///
    /// The request is sent and its status checked before this returns, so a
    /// rejected call surfaces as [`ProviderError::Status`] here. Transport
    /// failures after that arrive as items of the stream.
    pub async fn stream_chat(
        &self,
        messages: &[Message],
        model: &str,
    ) -> Result<ChatStream, ProviderError> {
        tracing::debug!(
            provider = self.name(),
            model,
            messages = messages.len(),
            "starting chat stream"
        );
        let request = match &self.backend {
            Backend::OpenAiCompatible { .. } => self
                .http
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&openai::ChatRequest::streaming(model, messages)),
            Backend::Gemini => self
                .http
                .post(format!("{}/{}:streamGenerateContent", self.base_url, model))
                .query(&[("key", self.api_key.as_str()), ("alt", "sse")])
                .json(&gemini::GenerateRequest::from_messages(messages)),
        };

        let response = check_status(request.send().await?).await?;
        let bytes = response.bytes_stream().map_err(ProviderError::from);

        Ok(match &self.backend {
            Backend::OpenAiCompatible { .. } => openai::decode_stream(bytes).boxed(),
            Backend::Gemini => gemini::decode_stream(bytes).boxed(),
        })
    }

    /// Cost of a call in dollars, or `None` if `model` has no known price.
    pub fn calculate_cost(
        &self,
        prompt_tokens: usize,
        completion_tokens: usize,
        model: &str,
    ) -> Option<f64> {
        match &self.backend {
            Backend::OpenAiCompatible { prices } => {
                pricing::lookup_cost(prices, prompt_tokens, completion_tokens, model)
            }
            Backend::Gemini => None,
        }
    }
}

#[cfg(test)]
impl Provider {
    /// Replaces the price table directly.
    pub(crate) fn set_prices(&mut self, table: PriceTable) {
        if let Backend::OpenAiCompatible { prices } = &mut self.backend {
            *prices = table;
        }
    }
}
