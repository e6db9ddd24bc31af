//! The core models for managing a stateful tutoring chat: role-tagged
//! messages and the append-only transcript that owns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::Assistant => "assistant",
            Role::User => "user",
        }
    }
}

/// One entry in a transcript. Immutable once appended; corrections are
/// new messages. The wire payload sent to the completion provider only
/// carries `role` and `content`, the remaining fields are local
/// annotations.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_latency_ms: Option<u64>,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp: None,
            word_count: None,
            response_latency_ms: None,
        }
    }

    /// A user or assistant turn: stamped with the current time and the
    /// whitespace-delimited word count of its content.
    pub fn turn(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp: Some(Utc::now()),
            word_count: Some(content.split_whitespace().count()),
            response_latency_ms: None,
        }
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.response_latency_ms = Some(latency_ms);
        self
    }
}

/// Ordered, append-only sequence of messages for one session. Append
/// order is the sole ordering guarantee: no reordering, no
/// deduplication.
#[derive(Default, Clone)]
pub struct Transcript(Vec<Message>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn new_with_messages(messages: Vec<Message>) -> Self {
        Self(messages)
    }

    /// Seed the preamble for a fresh session: the instruction as the
    /// one and only system message, then a canned assistant greeting.
    pub fn seeded(instruction: &str, greeting: &str) -> Self {
        Self(vec![
            Message::new(Role::System, instruction),
            Message::new(Role::Assistant, greeting),
        ])
    }

    /// Add a message to the end. Rejects content that is empty after
    /// trimming so a blank line can never enter the transcript.
    pub fn append(&mut self, msg: Message) -> Result<(), SessionError> {
        if msg.content.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        self.0.push(msg);
        Ok(())
    }

    /// Drop the most recent message. Used to roll a failed turn back to
    /// the state it started from.
    pub fn pop(&mut self) -> Option<Message> {
        self.0.pop()
    }

    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    /// The transcript as shown to the user: system-role messages are
    /// filtered out. Presentation only, the underlying store is
    /// untouched.
    pub fn visible(&self) -> Vec<Message> {
        self.0
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.0.iter()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.0
    }
}
