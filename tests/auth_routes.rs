use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use todo_lists::{
    routes::{API_PREFIX, app},
    state::AppState,
    test_helpers::test_state,
};

async fn post_json(state: &Arc<AppState>, path: &str, body: Value) -> (StatusCode, Value) {
    send(
        state,
        Request::builder()
            .method("POST")
            .uri(format!("{API_PREFIX}{path}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
}

async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
    let response = app(state.clone())
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    (
        status,
        serde_json::from_slice(&bytes).expect("body should be json"),
    )
}

fn access_token(body: &Value) -> String {
    body["data"]["access_token"]
        .as_str()
        .expect("access token should be present")
        .to_string()
}

#[tokio::test]
async fn registered_user_can_log_in_and_use_the_api() {
    let state = test_state().await.expect("test state should build");
    let credentials = json!({ "email": "dana@example.com", "password": "password123" });

    let (status, registered) = post_json(&state, "/auth/register", credentials.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(registered["data"]["token_type"], "Bearer");
    assert_eq!(registered["data"]["expires_in"], 3600);

    let (status, logged_in) = post_json(&state, "/auth/login", credentials).await;
    assert_eq!(status, StatusCode::OK);
    let token = access_token(&logged_in);

    let (status, created) = send(
        &state,
        Request::builder()
            .method("POST")
            .uri(format!("{API_PREFIX}/todo-lists"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "title": "Via login" }).to_string()))
            .expect("request should build"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["data"]["title"], "Via login");
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let state = test_state().await.expect("test state should build");
    let credentials = json!({ "email": "erin@example.com", "password": "password123" });

    let (status, _) = post_json(&state, "/auth/register", credentials.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&state, "/auth/register", credentials).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "EMAIL_TAKEN");
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let state = test_state().await.expect("test state should build");
    post_json(
        &state,
        "/auth/register",
        json!({ "email": "frank@example.com", "password": "password123" }),
    )
    .await;

    let (status, body) = post_json(
        &state,
        "/auth/login",
        json!({ "email": "frank@example.com", "password": "not-the-password" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn malformed_bodies_are_invalid_payload() {
    let state = test_state().await.expect("test state should build");

    let (status, body) =
        post_json(&state, "/auth/register", json!({ "email": "x@example.com" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "INVALID_PAYLOAD");

    let (status, body) = post_json(
        &state,
        "/auth/register",
        json!({ "email": "x@example.com", "password": "short" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "password must be at least 8 characters");
}
