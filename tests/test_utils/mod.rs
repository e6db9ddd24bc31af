//! Test utilities for integration tests
use std::env;
use std::fs;
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use tower::util::ServiceExt;

use quill::api::{AppState, app};
use quill::core::AppConfig;
use quill::core::db::{async_db, initialize_db};

/// Creates a test application router backed by a fresh database in a
/// temporary directory. The completion provider hostname is injected
/// so tests can point it at a local mock server.
pub async fn test_app(llm_hostname: &str) -> Router {
    // Create a unique directory for the test with a randomly
    // generated name using a timestamp to avoid collisions
    let temp_dir = env::temp_dir();
    let ts = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
        .to_string();
    let dir = temp_dir.join(format!("quill-test-{}", ts));

    let db_path = dir.join("db");
    let export_path = dir.join("exports");
    fs::create_dir_all(&db_path).expect("Failed to create db directory");
    fs::create_dir_all(&export_path).expect("Failed to create exports directory");

    let db = async_db(db_path.to_str().unwrap())
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to migrate db");
        Ok(())
    })
    .await
    .unwrap();

    let app_config = AppConfig {
        db_path: db_path.display().to_string(),
        export_path: export_path.display().to_string(),
        openai_api_hostname: llm_hostname.to_string(),
        openai_api_key: String::from("test-api-key"),
        openai_model: String::from("gpt-4o-mini"),
        max_response_tokens: 150,
        temperature: 1.0,
        presence_penalty: None,
        frequency_penalty: None,
        completion_timeout: Duration::from_secs(5),
        system_message: String::from("You are a helpful writing tutor."),
        greeting: String::from("Hi! What topic would you like to write about?"),
    };
    let app_state = AppState::new(db, app_config);
    app(Arc::new(RwLock::new(app_state)))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Register an account and log it in, returning the bearer token the
/// chat routes expect.
pub async fn register_and_login(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/register")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "email": email, "password": "hunter2" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/login")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "email": email, "password": "hunter2" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_string(response.into_body()).await;
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    value["token"].as_str().unwrap().to_string()
}
