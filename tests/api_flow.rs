use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Duration;
use serde_json::{Value, json};
use tower::ServiceExt;

use chatheon::app::build_router;
use chatheon::middleware::http::HttpLimits;
use chatheon::services::auth::{PasswordHasher, TokenCodec, TokenConfig};
use chatheon::state::AppState;

fn app() -> Router {
    let codec = TokenCodec::new(&TokenConfig::new("integration-secret", Duration::hours(1)))
        .expect("codec");
    let state = AppState::in_memory(Arc::new(codec), PasswordHasher::new(4));
    build_router(state, HttpLimits::default())
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers and logs in, returning (user id, token).
async fn signup(app: &Router, username: &str) -> (String, String) {
    let creds = json!({"username": username, "password": "pw"});

    let (status, body) = send(app, "POST", "/api/v1/register", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(app, "POST", "/api/v1/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);

    (id, body["token"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn register_and_login_errors() {
    let app = app();
    signup(&app, "alice").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({"username": "alice", "password": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "USERNAME_TAKEN");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({"username": "", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({"username": "bob"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({"username": "alice", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn protected_routes_reject_without_valid_token() {
    let app = app();
    let (_, token) = signup(&app, "alice").await;
    let expected = json!({"error": {"code": "UNAUTHORIZED", "message": "unauthorized"}});

    for (method, uri) in [
        ("GET", "/api/v1/conversations"),
        ("GET", "/api/v1/messages"),
        ("GET", "/api/v1/messages/sent"),
    ] {
        let (status, body) = send(&app, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body, expected);

        let tampered = format!("{token}x");
        let (status, body) = send(&app, method, uri, Some(&tampered), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body, expected);
    }
}

#[tokio::test]
async fn unknown_path_is_not_found_rather_than_unauthorized() {
    let app = app();
    let (status, _) = send(&app, "GET", "/api/v1/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn conversations_include_caller() {
    let app = app();
    let (alice_id, alice) = signup(&app, "alice").await;
    let (bob_id, bob) = signup(&app, "bob").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/conversations",
        Some(&alice),
        Some(json!({"participant_ids": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/conversations",
        Some(&alice),
        Some(json!({"participant_ids": [bob_id]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["participant_ids"], json!([bob_id, alice_id]));

    let (status, listed) = send(&app, "GET", "/api/v1/conversations", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
}

#[tokio::test]
async fn message_flow() {
    let app = app();
    let (alice_id, alice) = signup(&app, "alice").await;
    let (bob_id, bob) = signup(&app, "bob").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/messages",
        Some(&alice),
        Some(json!({"receiver_id": bob_id, "content": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for content in ["one", "two", "three"] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/messages",
            Some(&alice),
            Some(json!({"receiver_id": bob_id, "content": content})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["sender_id"], alice_id);
        assert_eq!(body["status"], "sent");
    }

    let (status, inbox) = send(&app, "GET", "/api/v1/messages", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox.as_array().unwrap().len(), 3);

    let (_, page) = send(
        &app,
        "GET",
        "/api/v1/messages?limit=1&offset=1",
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["content"], "two");

    let (status, _) = send(&app, "GET", "/api/v1/messages?limit=0", Some(&bob), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "GET", "/api/v1/messages?offset=-2", Some(&bob), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, sent) = send(&app, "GET", "/api/v1/messages/sent", Some(&alice), None).await;
    assert_eq!(sent.as_array().unwrap().len(), 3);
    let (_, alice_inbox) = send(&app, "GET", "/api/v1/messages", Some(&alice), None).await;
    assert!(alice_inbox.as_array().unwrap().is_empty());

    let id = inbox[0]["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/messages/{id}/status"),
        Some(&bob),
        Some(json!({"status": "read"})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, inbox) = send(&app, "GET", "/api/v1/messages", Some(&bob), None).await;
    assert_eq!(inbox[0]["status"], "read");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/messages/{id}/status"),
        Some(&bob),
        Some(json!({"status": "lost"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_STATUS");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/messages/not-a-uuid/status",
        Some(&bob),
        Some(json!({"status": "read"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/messages/00000000-0000-0000-0000-000000000000/status",
        Some(&bob),
        Some(json!({"status": "read"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
