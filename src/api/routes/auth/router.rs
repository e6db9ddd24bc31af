//! Router for the auth API

use std::sync::{Arc, RwLock};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use super::public;
use crate::api::state::AppState;
use crate::identity;

type SharedState = Arc<RwLock<AppState>>;

/// Create a new account from an email and password pair
async fn register_handler(
    State(state): State<SharedState>,
    axum::Json(payload): axum::Json<public::RegisterRequest>,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let db = state.read().expect("Unable to read shared state").db.clone();

    let (identity, token) = identity::register(&db, &payload.email, &payload.password).await?;

    Ok((
        StatusCode::CREATED,
        axum::Json(public::RegisterResponse {
            id: identity.id,
            email: identity.email,
            token,
        }),
    ))
}

/// Exchange an email and password pair for a bearer token
async fn login_handler(
    State(state): State<SharedState>,
    axum::Json(payload): axum::Json<public::LoginRequest>,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let db = state.read().expect("Unable to read shared state").db.clone();

    let (identity, token) = identity::authenticate(&db, &payload.email, &payload.password).await?;

    Ok(axum::Json(public::LoginResponse {
        token,
        email: identity.email,
    }))
}

/// Create the auth router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
}
