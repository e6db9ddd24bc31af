//! Router for the chat API. Every route resolves the bearer token to
//! an account before touching the transcript.

use std::sync::{Arc, RwLock};

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};

use super::public;
use crate::api::state::AppState;
use crate::core::AppConfig;
use crate::error::SessionError;
use crate::identity::{Identity, identity_for_token};
use crate::openai::{CompletionAdapter, OpenAiCompletion};
use crate::tutor::db::{clear_transcript, load_transcript};
use crate::tutor::export::export_transcript;
use crate::tutor::session::SessionBuilder;
use crate::tutor::Transcript;

type SharedState = Arc<RwLock<AppState>>;

fn bearer_token(headers: &HeaderMap) -> Result<String, SessionError> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string())
        .ok_or_else(|| SessionError::Auth("missing bearer token".to_string()))
}

async fn authenticated(
    state: &SharedState,
    headers: &HeaderMap,
) -> Result<(tokio_rusqlite::Connection, AppConfig, Identity), SessionError> {
    let (db, config) = {
        let shared_state = state.read().expect("Unable to read shared state");
        (shared_state.db.clone(), shared_state.config.clone())
    };
    let token = bearer_token(headers)?;
    let identity = identity_for_token(&db, &token).await?;

    Ok((db, config, identity))
}

/// The account's transcript, seeded with the tutor preamble when no
/// turns have been stored yet.
async fn current_transcript(
    db: &tokio_rusqlite::Connection,
    config: &AppConfig,
    identity: &Identity,
) -> Result<Transcript, anyhow::Error> {
    let stored = load_transcript(db, &identity.id).await?;
    let transcript = if stored.is_empty() {
        Transcript::seeded(&config.system_message, &config.greeting)
    } else {
        Transcript::new_with_messages(stored)
    };

    Ok(transcript)
}

/// Run one tutoring turn and return the tutor's reply
async fn turn_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<public::ChatTurnRequest>,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let (db, config, identity) = authenticated(&state, &headers).await?;

    let transcript = current_transcript(&db, &config, &identity).await?;
    let adapter: Arc<dyn CompletionAdapter> =
        Arc::new(OpenAiCompletion::new(config.completion_config()));
    let mut session = SessionBuilder::new(adapter)
        .transcript(transcript.into_messages())
        .persistence(&db, identity)
        .build();

    let reply = session.handle_turn(&payload.message).await?;

    Ok(axum::Json(public::ChatTurnResponse::new(&reply.content)))
}

/// The transcript as the student sees it
async fn transcript_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let (db, config, identity) = authenticated(&state, &headers).await?;

    let transcript = current_transcript(&db, &config, &identity).await?;

    Ok(axum::Json(public::ChatTranscriptResponse {
        transcript: transcript.visible(),
    }))
}

/// Write the transcript to the export directory and return where it
/// landed
async fn export_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let (db, config, identity) = authenticated(&state, &headers).await?;

    let transcript = current_transcript(&db, &config, &identity).await?;
    let location = export_transcript(&config.export_path, &identity, &transcript)?;

    Ok(axum::Json(public::ChatExportResponse {
        location: location.display().to_string(),
    }))
}

/// Drop the stored transcript so the next turn starts a fresh session
async fn clear_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let (db, _config, identity) = authenticated(&state, &headers).await?;

    clear_transcript(&db, &identity.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/",
            post(turn_handler)
                .get(transcript_handler)
                .delete(clear_handler),
        )
        .route("/export", post(export_handler))
}
