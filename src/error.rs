use thiserror::Error;

/// Failure while requesting the next assistant message from the
/// completion provider. The provider is an opaque collaborator so
/// everything it can do wrong is collapsed into these cases.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request timed out")]
    Timeout,

    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("completion provider returned no message")]
    EmptyResponse,
}

/// Errors surfaced by a tutoring session. Each variant maps to a
/// distinct user-visible notice; see `api::public` for the HTTP
/// mapping.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Input was empty after trimming whitespace. Recovered locally,
    /// no state change, the user is re-prompted.
    #[error("message is empty, please enter some text")]
    EmptyMessage,

    /// Registration input failed a shape check, malformed email or
    /// empty password.
    #[error("invalid credentials: {0}")]
    Validation(String),

    /// Registration collided with an existing account.
    #[error("an account already exists for {0}")]
    EmailInUse(String),

    /// Bad or missing credential. The session stays unauthenticated.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The provider call failed. The transcript is left exactly as it
    /// was before the turn so the same input can be retried.
    #[error("assistant unavailable: {0}")]
    Completion(#[from] CompletionError),

    /// Durable storage failed. Never unwinds a completed turn.
    #[error("persistence failed: {0}")]
    Persistence(String),
}
