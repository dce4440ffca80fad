//! Model identifier parsing.
//!
//! Identifiers have the form `provider/model`. Only the first `/` splits;
//! the model segment is passed to the backend verbatim, so OpenRouter ids
//! such as `openrouter/deepseek/deepseek-chat` keep their inner slash.

/// A parsed `provider/model` identifier borrowing from its source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelId<'a> {
    pub provider: &'a str,
    pub model: &'a str,
}

impl<'a> ModelId<'a> {
    /// Splits `id` on its first `/`. Both segments must be non-empty.
    pub fn parse(id: &'a str) -> Option<Self> {
        let (provider, model) = id.trim().split_once('/')?;
        if provider.is_empty() || model.is_empty() {
            return None;
        }
        Some(Self { provider, model })
    }
}
