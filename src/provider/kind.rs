//! Provider kind enumeration and default endpoints.

use crate::constants::{GEMINI_BASE_URL, OPENAI_BASE_URL, OPENROUTER_BASE_URL};

/// Identifies which LLM backend a provider talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// OpenAI (chat-completions API).
    OpenAI,
    /// OpenRouter (OpenAI-compatible gateway with per-model pricing).
    OpenRouter,
    /// Google Gemini (generative language API).
    Gemini,
}

impl ProviderKind {
    /// Every supported kind, in construction order.
    pub const ALL: [ProviderKind; 3] = [Self::OpenAI, Self::OpenRouter, Self::Gemini];

    /// Parses a provider name. Matching is case-insensitive.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Self::OpenAI),
            "openrouter" => Some(Self::OpenRouter),
            "gemini" => Some(Self::Gemini),
            _ => None,
        }
    }

    /// Routing name, the `provider` segment of a model identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::OpenRouter => "openrouter",
            Self::Gemini => "gemini",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAI => OPENAI_BASE_URL,
            Self::OpenRouter => OPENROUTER_BASE_URL,
            Self::Gemini => GEMINI_BASE_URL,
        }
    }

    /// Whether model listings from this backend carry token prices.
    pub fn lists_prices(&self) -> bool {
        matches!(self, Self::OpenRouter)
    }
}
