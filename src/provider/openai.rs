//! OpenAI-compatible chat-completions wire protocol.
//!
//! Shared by OpenAI and OpenRouter. Requests carry the generic message shape
//! unchanged; streamed responses are `data: <json>` lines terminated by
//! `data: [DONE]`.

use futures::future;
use futures::stream::{Stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ProviderError;
use super::pricing::{ModelPrice, PriceTable};
use super::sse::{self, Frame};
use crate::message::Message;

/// Body of `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub stream: bool,
}

impl<'a> ChatRequest<'a> {
    pub fn streaming(model: &'a str, messages: &'a [Message]) -> Self {
        Self {
            model,
            messages,
            stream: true,
        }
    }
}

/// Response of `GET /models`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    pricing: Option<Pricing>,
}

/// OpenRouter's per-token prices. Values arrive as strings or numbers.
#[derive(Debug, Default, Deserialize)]
struct Pricing {
    #[serde(default)]
    prompt: Option<PriceValue>,
    #[serde(default)]
    completion: Option<PriceValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            PriceValue::Number(n) => Some(*n),
            PriceValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

fn price_of(value: &Option<PriceValue>) -> Option<f64> {
    match value {
        None => Some(0.0),
        Some(v) => v.as_f64(),
    }
}

impl ModelList {
    pub fn ids(&self) -> Vec<String> {
        self.data.iter().map(|m| m.id.clone()).collect()
    }

    /// Price table built from every entry whose prices parse.
    pub fn prices(&self) -> PriceTable {
        self.data
            .iter()
            .filter_map(|m| {
                let pricing = m.pricing.as_ref();
                let input = pricing.map_or(Some(0.0), |p| price_of(&p.prompt))?;
                let output = pricing.map_or(Some(0.0), |p| price_of(&p.completion))?;
                Some((m.id.clone(), ModelPrice { input, output }))
            })
            .collect()
    }
}

/// Interprets one `data:` payload.
pub(crate) fn decode_payload(payload: &str) -> Frame {
    if payload == "[DONE]" {
        tracing::debug!("end-of-stream marker received");
        return Frame::Done;
    }
    let Ok(value) = serde_json::from_str::<Value>(payload) else {
        return Frame::Skip;
    };
    match value["choices"][0]["delta"]["content"].as_str() {
        Some(text) if !text.is_empty() => Frame::Text(text.to_string()),
        _ => Frame::Skip,
    }
}

/// Decodes a streamed chat-completions body into text fragments.
///
/// Stops at `[DONE]` without reading further.
pub(crate) fn decode_stream<S, B>(bytes: S) -> impl Stream<Item = Result<String, ProviderError>>
where
    S: Stream<Item = Result<B, ProviderError>>,
    B: AsRef<[u8]>,
{
    sse::data_lines(bytes)
        .map_ok(|payload| decode_payload(&payload))
        .take_while(|frame| future::ready(!matches!(frame, Ok(Frame::Done))))
        .try_filter_map(|frame| {
            future::ready(Ok(match frame {
                Frame::Text(text) => Some(text),
                Frame::Done | Frame::Skip => None,
            }))
        })
}
