//! Centralized constants for freechat.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "freechat";

/// Version shown in the welcome banner.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default model identifier, in `provider/model` form.
pub const DEFAULT_MODEL: &str = "openrouter/deepseek/deepseek-chat-v3.1:free";

/// Name of the prompt seeded into new sessions when none is configured.
pub const DEFAULT_PROMPT_NAME: &str = "default";

/// Prompt name shown when no system prompt could be resolved.
pub const NO_PROMPT_NAME: &str = "none";

// --- Files ---

/// Main settings filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// System prompt library filename.
pub const PROMPTS_FILENAME: &str = "prompts.toml";

/// Readline history filename.
pub const HISTORY_FILENAME: &str = "history.txt";

/// Directory (inside the config dir) that receives exports.
pub const SESSIONS_DIRNAME: &str = "sessions";

/// Directory next to the executable that switches freechat to portable mode.
pub const PORTABLE_DIRNAME: &str = "freechat_config";

/// Prefix of exported transcript filenames.
pub const EXPORT_FILE_PREFIX: &str = "freechat_session_";

/// Settings written on first run.
pub const DEFAULT_CONFIG_TOML: &str = r#"# FreeChat Main Configuration
[general]
# The format is "provider_name/model_identifier".
# NOTE: Use the exact model ID required by the API.
default_model = "openrouter/deepseek/deepseek-chat-v3.1:free"
default_prompt = "default"

[providers]
# Values may reference environment variables as "{env:VAR}".
# OPENAI_API_KEY, OPENROUTER_API_KEY and GEMINI_API_KEY override these.
openai_api_key = ""
openrouter_api_key = ""
gemini_api_key = ""
# Optional endpoint overrides:
# openai_base_url = "https://api.openai.com/v1"
# openrouter_base_url = "https://openrouter.ai/api/v1"
# gemini_base_url = "https://generativelanguage.googleapis.com/v1beta/models"
"#;

/// Prompt library written on first run.
pub const DEFAULT_PROMPTS_TOML: &str = r#"# FreeChat System Prompts
[default]
prompt = """You are FreeChat, a helpful and concise AI assistant running in a terminal."""

[coder]
prompt = """You are an expert programmer. Provide only code solutions."""

[translator]
prompt = """You are a multilingual translator. Your task is to translate the user's text into English."""
"#;

// --- Provider endpoints ---

/// Default base URL for the OpenAI API.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default base URL for the OpenRouter API.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default base URL for the Gemini models API.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// --- Network ---

/// Connect timeout for provider requests, in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Read timeout between streamed chunks, in seconds.
pub const READ_TIMEOUT_SECS: u64 = 120;
