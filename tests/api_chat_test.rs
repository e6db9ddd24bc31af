//! Integration tests for the chat API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serial_test::serial;
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_string, register_and_login, test_app};

    async fn completion_mock(server: &mut mockito::ServerGuard, content: &str) -> mockito::Mock {
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "choices": [{
                        "message": { "role": "assistant", "content": content }
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await
    }

    fn turn_request(token: &str, message: &str) -> Request<Body> {
        Request::builder()
            .uri("/api/chat")
            .method("POST")
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::from(serde_json::json!({ "message": message }).to_string()))
            .unwrap()
    }

    fn get_transcript_request(token: &str) -> Request<Body> {
        Request::builder()
            .uri("/api/chat")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn it_requires_a_bearer_token() {
        let app = test_app("https://api.openai.com").await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/chat")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({ "message": "Hello" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/chat")
                    .header("authorization", "Bearer no-such-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn it_runs_a_turn_and_returns_the_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = completion_mock(
            &mut server,
            "Great choice! What aspect of climate change interests you most?",
        )
        .await;

        let app = test_app(&server.url()).await;
        let token = register_and_login(&app, "student@example.com").await;

        let response = app
            .oneshot(turn_request(&token, "Climate change"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        mock.assert_async().await;

        let body = body_to_string(response.into_body()).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            value["message"],
            "Great choice! What aspect of climate change interests you most?"
        );
    }

    #[tokio::test]
    #[serial]
    async fn it_shows_the_greeting_for_a_fresh_session() {
        let app = test_app("https://api.openai.com").await;
        let token = register_and_login(&app, "student@example.com").await;

        let response = app.oneshot(get_transcript_request(&token)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let transcript = value["transcript"].as_array().unwrap();

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0]["role"], "assistant");
        assert_eq!(
            transcript[0]["content"],
            "Hi! What topic would you like to write about?"
        );
    }

    #[tokio::test]
    #[serial]
    async fn it_returns_the_visible_transcript_after_a_turn() {
        let mut server = mockito::Server::new_async().await;
        completion_mock(&mut server, "What angle interests you?").await;

        let app = test_app(&server.url()).await;
        let token = register_and_login(&app, "student@example.com").await;

        let response = app
            .clone()
            .oneshot(turn_request(&token, "Climate change"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_transcript_request(&token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let transcript = value["transcript"].as_array().unwrap();

        // Greeting, the student's message, and the tutor's reply. The
        // system instruction never appears.
        assert_eq!(transcript.len(), 3);
        assert!(transcript.iter().all(|m| m["role"] != "system"));
        assert_eq!(transcript[1]["content"], "Climate change");
        assert_eq!(transcript[2]["content"], "What angle interests you?");
    }

    #[tokio::test]
    #[serial]
    async fn it_rejects_an_empty_message() {
        let app = test_app("https://api.openai.com").await;
        let token = register_and_login(&app, "student@example.com").await;

        let response = app.oneshot(turn_request(&token, "   \n")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn it_surfaces_provider_failure_and_keeps_the_transcript() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "boom"}}"#)
            .create_async()
            .await;

        let app = test_app(&server.url()).await;
        let token = register_and_login(&app, "student@example.com").await;

        let response = app
            .clone()
            .oneshot(turn_request(&token, "Climate change"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        // The failed turn left no trace, only the greeting is visible
        let response = app.oneshot(get_transcript_request(&token)).await.unwrap();
        let body = body_to_string(response.into_body()).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["transcript"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn it_exports_the_transcript_to_a_file() {
        let mut server = mockito::Server::new_async().await;
        completion_mock(&mut server, "What angle interests you?").await;

        let app = test_app(&server.url()).await;
        let token = register_and_login(&app, "student@example.com").await;

        let response = app
            .clone()
            .oneshot(turn_request(&token, "Climate change"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/chat/export")
                    .method("POST")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let location = value["location"].as_str().unwrap();

        let contents = std::fs::read_to_string(location).unwrap();
        assert!(contents.contains("user: Climate change"));
        assert!(contents.contains("assistant: What angle interests you?"));
    }

    #[tokio::test]
    #[serial]
    async fn it_clears_the_transcript() {
        let mut server = mockito::Server::new_async().await;
        completion_mock(&mut server, "What angle interests you?").await;

        let app = test_app(&server.url()).await;
        let token = register_and_login(&app, "student@example.com").await;

        let response = app
            .clone()
            .oneshot(turn_request(&token, "Climate change"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/chat")
                    .method("DELETE")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // Back to a fresh session
        let response = app.oneshot(get_transcript_request(&token)).await.unwrap();
        let body = body_to_string(response.into_body()).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["transcript"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn it_returns_422_for_a_missing_message_field() {
        let app = test_app("https://api.openai.com").await;
        let token = register_and_login(&app, "student@example.com").await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/chat")
                    .method("POST")
                    .header("content-type", "application/json")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::from(serde_json::json!({}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
