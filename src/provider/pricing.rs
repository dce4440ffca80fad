//! Per-model token prices and cost calculation.

use std::collections::HashMap;

/// Price of one input and one output token, in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelPrice {
    pub input: f64,
    pub output: f64,
}

/// Model id → price. Empty until a listing populates it.
pub type PriceTable = HashMap<String, ModelPrice>;

impl ModelPrice {
    pub fn cost(&self, prompt_tokens: usize, completion_tokens: usize) -> f64 {
        prompt_tokens as f64 * self.input + completion_tokens as f64 * self.output
    }
}

/// Cost of a call, or `None` when the model has no known price.
///
/// `None` is deliberately distinct from `Some(0.0)`: free models are priced
/// at zero, unpriced models are unknown.
pub fn lookup_cost(
    prices: &PriceTable,
    prompt_tokens: usize,
    completion_tokens: usize,
    model: &str,
) -> Option<f64> {
    prices
        .get(model)
        .map(|p| p.cost(prompt_tokens, completion_tokens))
}
