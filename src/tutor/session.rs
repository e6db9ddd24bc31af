//! The turn loop for one tutoring conversation. A `Session` owns the
//! transcript, talks to the completion provider through the
//! `CompletionAdapter` seam, and persists a snapshot after every
//! successful turn when storage is attached.
//!
//! Use `SessionBuilder` to construct a valid `Session`.

use std::sync::Arc;
use std::time::Instant;

use tokio_rusqlite::Connection;

use super::db::save_transcript;
use super::{Message, Role, Transcript};
use crate::error::{CompletionError, SessionError};
use crate::identity::Identity;
use crate::openai::CompletionAdapter;

pub struct Session {
    adapter: Arc<dyn CompletionAdapter>,
    db: Option<Connection>,
    identity: Option<Identity>,
    transcript: Transcript,
}

impl Session {
    /// Run one turn: record the student's message, fetch the tutor's
    /// reply over the full transcript, and record that too.
    ///
    /// A failed completion rolls the student's message back out so the
    /// transcript is exactly as it was before the turn and the same
    /// input can be retried. A persistence failure after a completed
    /// turn is logged but never unwinds the turn.
    pub async fn handle_turn(&mut self, input: &str) -> Result<Message, SessionError> {
        self.transcript.append(Message::turn(Role::User, input))?;

        let started = Instant::now();
        let reply = match self.adapter.complete(self.transcript.messages()).await {
            Ok(reply) => reply,
            Err(err) => {
                self.transcript.pop();
                return Err(SessionError::Completion(err));
            }
        };
        let latency_ms = started.elapsed().as_millis() as u64;

        // An all-whitespace reply can't enter the transcript, treat it
        // the same as a provider that returned nothing.
        if reply.trim().is_empty() {
            self.transcript.pop();
            return Err(SessionError::Completion(CompletionError::EmptyResponse));
        }

        let msg = Message::turn(Role::Assistant, &reply).with_latency(latency_ms);
        self.transcript.append(msg.clone())?;

        if let (Some(db), Some(identity)) = (&self.db, &self.identity) {
            if let Err(err) = save_transcript(db, &identity.id, &self.transcript).await {
                tracing::error!(
                    "failed to persist transcript for account {}: {}",
                    identity.id,
                    err
                );
            }
        }

        Ok(msg)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

#[derive(Default)]
pub struct SessionBuilder {
    adapter: Option<Arc<dyn CompletionAdapter>>,
    db: Option<Connection>,
    identity: Option<Identity>,
    transcript: Transcript,
}

impl SessionBuilder {
    pub fn new(adapter: Arc<dyn CompletionAdapter>) -> Self {
        Self {
            adapter: Some(adapter),
            db: None,
            identity: None,
            transcript: Transcript::new(),
        }
    }

    pub fn build(self) -> Session {
        Session {
            // SessionBuilder::new is the only constructor so the
            // adapter is always present
            adapter: self.adapter.expect("SessionBuilder requires an adapter"),
            db: self.db,
            identity: self.identity,
            transcript: self.transcript,
        }
    }

    /// Start from the fixed preamble: the tutoring instruction as the
    /// single system message, then the canned greeting.
    pub fn seeded(mut self, instruction: &str, greeting: &str) -> Self {
        self.transcript = Transcript::seeded(instruction, greeting);
        self
    }

    /// Resume from previously stored messages.
    pub fn transcript(mut self, messages: Vec<Message>) -> Self {
        self.transcript = Transcript::new_with_messages(messages);
        self
    }

    /// Attach durable storage. Identity and connection always travel
    /// together since the account id keys the stored transcript.
    pub fn persistence(mut self, db: &Connection, identity: Identity) -> Self {
        self.db = Some(db.clone());
        self.identity = Some(identity);
        self
    }
}
