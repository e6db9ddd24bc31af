//! Public types for the auth API
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Registration logs the new account in immediately, so the response
/// carries a token alongside the account details.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub email: String,
    pub token: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The token is the only credential the chat routes accept.
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
}
