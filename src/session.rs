//! In-memory chat session state.
//!
//! A [`Session`] owns the ordered message log, the name of the active system
//! prompt, an optional user-chosen name and the running cost. Sessions are
//! never merged: applying a prompt or starting over replaces the whole value.

use crate::constants::NO_PROMPT_NAME;
use crate::message::{Message, Role};
use crate::prompts::PromptLibrary;

/// An active conversation.
#[derive(Debug, Clone)]
pub struct Session {
    pub messages: Vec<Message>,
    pub cost: f64,
    pub name: Option<String>,
    pub prompt_name: String,
}

impl Session {
    /// Creates a session seeded with a single system message.
    pub fn with_prompt(prompt_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(content)],
            cost: 0.0,
            name: None,
            prompt_name: prompt_name.into(),
        }
    }

    /// Creates a session with no system prompt at all.
    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            cost: 0.0,
            name: None,
            prompt_name: NO_PROMPT_NAME.to_string(),
        }
    }

    /// Builds a fresh session from a named prompt in the library.
    ///
    /// Returns `None` when the prompt does not exist or has no text.
    pub fn from_library(library: &PromptLibrary, prompt_name: &str) -> Option<Self> {
        library
            .get(prompt_name)
            .map(|content| Self::with_prompt(prompt_name, content))
    }

    /// Content of the leading system message, if a prompt is active.
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == Role::System)
            .map(|m| m.text())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn push(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    /// Drops every message past `len`. Used to undo a failed turn.
    pub fn rollback_to(&mut self, len: usize) {
        self.messages.truncate(len);
    }

    /// Adds a turn's cost to the running total. Unknown costs are ignored.
    pub fn add_cost(&mut self, cost: Option<f64>) {
        if let Some(c) = cost {
            self.cost += c;
        }
    }

    /// Messages that belong in a human-readable transcript.
    pub fn conversation(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role != Role::System)
    }
}
