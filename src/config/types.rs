//! Struct definitions and serde defaults for freechat configuration.

use serde::{Deserialize, Serialize};

/// Root settings, deserialized from `config.toml`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub general: General,
    /// Per-provider credentials and endpoint overrides.
    #[serde(default)]
    pub providers: Credentials,
}

/// The `[general]` table.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct General {
    /// Model identifier in `provider/model` form.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Prompt seeded into new sessions.
    #[serde(default = "default_prompt")]
    pub default_prompt: String,
}

/// The `[providers]` table.
///
/// An empty or missing key means the provider is not configured.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Credentials {
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub openrouter_api_key: Option<String>,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_base_url: Option<String>,
}

pub(super) fn default_model() -> String {
    crate::constants::DEFAULT_MODEL.to_string()
}

pub(super) fn default_prompt() -> String {
    crate::constants::DEFAULT_PROMPT_NAME.to_string()
}

impl Default for General {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            default_prompt: default_prompt(),
        }
    }
}

impl Credentials {
    /// Raw configured API key for a provider name, ignoring empty strings.
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        let key = match provider {
            "openai" => &self.openai_api_key,
            "openrouter" => &self.openrouter_api_key,
            "gemini" => &self.gemini_api_key,
            _ => &None,
        };
        key.as_deref().filter(|k| !k.is_empty())
    }

    /// Configured base URL override for a provider name.
    pub fn base_url(&self, provider: &str) -> Option<&str> {
        let url = match provider {
            "openai" => &self.openai_base_url,
            "openrouter" => &self.openrouter_base_url,
            "gemini" => &self.gemini_base_url,
            _ => &None,
        };
        url.as_deref().filter(|u| !u.is_empty())
    }
}

impl Settings {
    /// Copy safe to print: every API key is reduced to its last four characters.
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        for key in [
            &mut copy.providers.openai_api_key,
            &mut copy.providers.openrouter_api_key,
            &mut copy.providers.gemini_api_key,
        ] {
            if let Some(k) = key.as_mut() {
                *k = mask(k);
            }
        }
        copy
    }
}

fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
