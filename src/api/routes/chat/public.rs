//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::tutor::Message;

#[derive(Deserialize)]
pub struct ChatTurnRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatTurnResponse {
    message: String,
}

impl ChatTurnResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
pub struct ChatTranscriptResponse {
    pub transcript: Vec<Message>,
}

#[derive(Serialize)]
pub struct ChatExportResponse {
    pub location: String,
}
