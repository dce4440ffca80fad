//! Gemini `streamGenerateContent` wire protocol.
//!
//! Gemini has no system turn in this call shape, so the system prompt is
//! folded into the first user turn. The stream has no terminator; it ends
//! when the connection closes.

use futures::future;
use futures::stream::{Stream, TryStreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ProviderError;
use super::sse::{self, Frame};
use crate::message::{Message, Role};

/// Body of `POST {model}:streamGenerateContent`.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest {
    pub contents: Vec<Content>,
}

/// One Gemini turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Part {
    pub text: String,
}

impl Content {
    fn new(role: &'static str, text: String) -> Self {
        Self {
            role,
            parts: vec![Part { text }],
        }
    }
}

impl GenerateRequest {
    pub fn from_messages(messages: &[Message]) -> Self {
        Self {
            contents: to_contents(messages),
        }
    }
}

/// Reshapes generic messages into Gemini turns.
///
/// `user` stays `user`, `assistant` becomes `model`. The system prompt is
/// prepended, separated by a blank line, to the user message only when that
/// message opens the converted conversation.
pub(crate) fn to_contents(messages: &[Message]) -> Vec<Content> {
    let mut contents = Vec::with_capacity(messages.len());
    let mut system_prompt: Option<&str> = None;

    for msg in messages {
        match msg.role {
            Role::System => system_prompt = Some(msg.text()),
            Role::User => {
                let text = match system_prompt {
                    Some(sys) if !sys.is_empty() && contents.is_empty() => {
                        format!("{sys}\n\n{}", msg.text())
                    }
                    _ => msg.text().to_string(),
                };
                contents.push(Content::new("user", text));
            }
            Role::Assistant => contents.push(Content::new("model", msg.text().to_string())),
        }
    }
    contents
}

/// Response of `GET models`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ModelList {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    #[serde(default)]
    supported_generation_methods: Option<Vec<String>>,
}

impl ModelList {
    /// Ids of models that can generate content, without the `models/` prefix.
    pub fn ids(&self) -> Vec<String> {
        self.models
            .iter()
            .filter(|m| {
                m.supported_generation_methods
                    .as_ref()
                    .map_or(true, |methods| methods.iter().any(|x| x == "generateContent"))
            })
            .map(|m| m.name.strip_prefix("models/").unwrap_or(&m.name).to_string())
            .collect()
    }
}

/// Interprets one `data:` payload.
pub(crate) fn decode_payload(payload: &str) -> Frame {
    let Ok(value) = serde_json::from_str::<Value>(payload) else {
        return Frame::Skip;
    };
    match value["candidates"][0]["content"]["parts"][0]["text"].as_str() {
        Some(text) if !text.is_empty() => Frame::Text(text.to_string()),
        _ => Frame::Skip,
    }
}

/// Decodes a streamed Gemini body into text fragments.
pub(crate) fn decode_stream<S, B>(bytes: S) -> impl Stream<Item = Result<String, ProviderError>>
where
    S: Stream<Item = Result<B, ProviderError>>,
    B: AsRef<[u8]>,
{
    sse::data_lines(bytes).try_filter_map(|payload| {
        future::ready(Ok(match decode_payload(&payload) {
            Frame::Text(text) => Some(text),
            Frame::Done | Frame::Skip => None,
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream::{self, StreamExt};

    fn chunk(text: &str) -> String {
        format!(
            "data: {}\r\n\r\n",
            serde_json::json!({"candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]})
        )
    }

    #[tokio::test]
    async fn test_yields_parts_text_in_order() {
        let parts: Vec<Result<String, ProviderError>> = vec![
            Ok(chunk("Hel")),
            Ok("data: {\"candidates\": []}\r\n\r\n".to_string()),
            Ok("data: {\"usageMetadata\": {}}\r\n\r\n".to_string()),
            Ok("data: not-json\r\n\r\n".to_string()),
            Ok(chunk("lo")),
        ];
        let fragments: Vec<String> = decode_stream(stream::iter(parts))
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(fragments, vec!["Hel", "lo"]);
    }

    #[test]
    fn test_system_prompt_folded_into_first_user_turn() {
        let messages = vec![
            Message::system("Be terse."),
            Message::user("Hi"),
            Message::assistant("Hello"),
            Message::user("Bye"),
        ];
        assert_eq!(
            to_contents(&messages),
            vec![
                Content::new("user", "Be terse.\n\nHi".to_string()),
                Content::new("model", "Hello".to_string()),
                Content::new("user", "Bye".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_system_prompt() {
        let messages = vec![Message::user("Hi")];
        let body = serde_json::to_value(GenerateRequest::from_messages(&messages)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"contents": [{"role": "user", "parts": [{"text": "Hi"}]}]})
        );
    }

    #[test]
    fn test_model_list_strips_prefix_and_filters() {
        let list: ModelList = serde_json::from_str(
            r#"{"models": [
                {"name": "models/gemini-pro", "supportedGenerationMethods": ["generateContent", "countTokens"]},
                {"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]},
                {"name": "models/gemini-flash"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(list.ids(), vec!["gemini-pro", "gemini-flash"]);
    }
}
