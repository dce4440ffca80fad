//! Token counting for freechat.
//!
//! Uses tiktoken-rs for BPE tokenization. Provider token accounting differs
//! per backend, so cl100k_base (GPT-4 family) serves as a shared
//! approximation for every model. Counts feed cost estimates only.

use std::sync::LazyLock;

use tiktoken_rs::CoreBPE;

static BPE: LazyLock<Option<CoreBPE>> = LazyLock::new(|| match tiktoken_rs::cl100k_base() {
    Ok(bpe) => Some(bpe),
    Err(e) => {
        tracing::warn!("tokenizer unavailable, token counts will be zero: {e}");
        None
    }
});

/// Whether a tokenizer could be loaded.
pub fn tokenizer_available() -> bool {
    BPE.is_some()
}

/// Count tokens in `text`. Returns 0 when no tokenizer is available.
pub fn count_tokens(text: &str) -> usize {
    BPE.as_ref()
        .map(|bpe| bpe.encode_ordinary(text).len())
        .unwrap_or(0)
}
