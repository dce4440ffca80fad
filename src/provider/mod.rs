//! LLM provider abstraction for freechat.
//!
//! Wraps each remote backend behind a [`Provider`] struct with enum dispatch,
//! keeping wire-protocol details out of the chat layer. Supports OpenAI,
//! OpenRouter (both OpenAI-compatible) and Gemini via [`ProviderKind`].

mod client;
mod error;
mod factory;
mod gemini;
mod kind;
mod listing;
mod openai;
mod pricing;
mod resolve;
mod sse;

pub use client::Provider;
pub use error::ProviderError;
pub use factory::ProviderFactory;
pub use listing::list_models;

#[cfg(test)]
mod tests;
