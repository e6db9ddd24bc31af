//! Email and password accounts. A successful login mints an opaque
//! bearer token which is the only credential the chat API accepts.
//! Passwords are stored as salted digests and never leave this module.

pub mod db;

use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use crate::error::SessionError;

/// Everything downstream code may know about who is chatting. The id
/// keys transcript storage and export filenames.
#[derive(Clone, Debug, Serialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

fn digest_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn verify_password(password: &str, salt: &str, expected_digest: &str) -> bool {
    let candidate = digest_password(password, salt);
    candidate.as_bytes().ct_eq(expected_digest.as_bytes()).into()
}

/// Create an account and mint its first bearer token so a new student
/// can start chatting without a separate login.
pub async fn register(
    db: &Connection,
    email: &str,
    password: &str,
) -> Result<(Identity, String), SessionError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(SessionError::Validation(
            "email must look like an address".to_string(),
        ));
    }
    if password.is_empty() {
        return Err(SessionError::Validation(
            "password must not be empty".to_string(),
        ));
    }

    let existing = db::find_account_by_email(db, &email)
        .await
        .map_err(|e| SessionError::Persistence(e.to_string()))?;
    if existing.is_some() {
        return Err(SessionError::EmailInUse(email));
    }

    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = hex::encode(salt_bytes);
    let password_digest = digest_password(password, &salt);
    let id = Uuid::new_v4().to_string();

    db::insert_account(db, &id, &email, &password_digest, &salt)
        .await
        .map_err(|e| SessionError::Persistence(e.to_string()))?;

    let token = Uuid::new_v4().to_string();
    db::set_account_token(db, &id, &token)
        .await
        .map_err(|e| SessionError::Persistence(e.to_string()))?;

    Ok((Identity { id, email }, token))
}

/// Check a credential pair and mint a fresh bearer token. The failure
/// message is identical for an unknown email and a wrong password.
pub async fn authenticate(
    db: &Connection,
    email: &str,
    password: &str,
) -> Result<(Identity, String), SessionError> {
    let email = email.trim().to_lowercase();
    let account = db::find_account_by_email(db, &email)
        .await
        .map_err(|e| SessionError::Persistence(e.to_string()))?
        .ok_or_else(|| SessionError::Auth("unknown email or wrong password".to_string()))?;

    if !verify_password(password, &account.salt, &account.password_digest) {
        return Err(SessionError::Auth(
            "unknown email or wrong password".to_string(),
        ));
    }

    let token = Uuid::new_v4().to_string();
    db::set_account_token(db, &account.id, &token)
        .await
        .map_err(|e| SessionError::Persistence(e.to_string()))?;

    Ok((
        Identity {
            id: account.id,
            email: account.email,
        },
        token,
    ))
}

/// Resolve a bearer token back to the identity it was minted for.
pub async fn identity_for_token(db: &Connection, token: &str) -> Result<Identity, SessionError> {
    let row = db::find_account_by_token(db, token)
        .await
        .map_err(|e| SessionError::Persistence(e.to_string()))?
        .ok_or_else(|| SessionError::Auth("invalid or expired token".to_string()))?;

    Ok(Identity {
        id: row.0,
        email: row.1,
    })
}
