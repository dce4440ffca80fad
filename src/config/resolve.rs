//! Environment variable substitution and API key resolution.

use super::types::{Credentials, Settings};

impl Settings {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        self.general.default_model = resolve_str(&self.general.default_model);
        self.general.default_prompt = resolve_str(&self.general.default_prompt);
        self.providers.resolve_substitutions();
    }

    /// Let `<PROVIDER>_API_KEY` environment variables override configured keys.
    pub(super) fn apply_env_overrides(&mut self) {
        for (provider, slot) in [
            ("openai", &mut self.providers.openai_api_key),
            ("openrouter", &mut self.providers.openrouter_api_key),
            ("gemini", &mut self.providers.gemini_api_key),
        ] {
            if let Some(key) = env_api_key(provider) {
                *slot = Some(key);
            }
        }
    }
}

/// Non-empty `OPENAI_API_KEY` / `OPENROUTER_API_KEY` / `GEMINI_API_KEY`.
fn env_api_key(provider: &str) -> Option<String> {
    let env_key = format!("{}_API_KEY", provider.to_uppercase());
    std::env::var(env_key).ok().filter(|v| !v.is_empty())
}

impl Credentials {
    fn resolve_substitutions(&mut self) {
        for field in [
            &mut self.openai_api_key,
            &mut self.openrouter_api_key,
            &mut self.gemini_api_key,
            &mut self.openai_base_url,
            &mut self.openrouter_base_url,
            &mut self.gemini_base_url,
        ] {
            if let Some(value) = field {
                *value = resolve_str(value);
            }
        }
    }
}

/// Replace {env:VAR} with the environment variable value.
fn resolve_str(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("{env:") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 5..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}
