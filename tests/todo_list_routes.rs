use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use todo_lists::{
    db::dao::DaoContext,
    routes::{API_PREFIX, app},
    state::AppState,
    test_helpers::{bearer_for, test_state},
};

fn api_path(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

async fn state() -> Arc<AppState> {
    test_state().await.expect("test state should build")
}

/// Inserts a user directly and returns its id with a bearer header.
async fn user(state: &Arc<AppState>, email: &str) -> (i64, String) {
    let created = DaoContext::new(&state.db)
        .user()
        .create_user(&CancellationToken::new(), email, "unused-hash")
        .await
        .expect("user should insert");
    let bearer = bearer_for(state, created.id).expect("token should encode");
    (created.id, bearer)
}

async fn call(
    state: &Arc<AppState>,
    method: &str,
    path: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(api_path(path));
    if let Some(bearer) = bearer {
        request = request.header(header::AUTHORIZATION, bearer);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request should build");

    let response = app(state.clone())
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = serde_json::from_slice(&bytes).expect("body should be json");
    (status, json)
}

async fn create(state: &Arc<AppState>, bearer: &str, body: Value) -> (StatusCode, Value) {
    call(state, "POST", "/todo-lists", Some(bearer), Some(body)).await
}

#[tokio::test]
async fn create_then_fetch_by_id_and_owner() {
    let state = state().await;
    let (owner_id, bearer) = user(&state, "alice@example.com").await;

    let (status, created) = create(
        &state,
        &bearer,
        json!({
            "title": "Groceries",
            "description": "milk, eggs",
            "scheduled_at": "2026-03-01T09:30:00+07:00"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["message"], "Success");
    assert_eq!(created["status"], 200);
    assert_eq!(created["data"]["owner_id"], owner_id);
    assert_eq!(created["data"]["title"], "Groceries");
    let id = created["data"]["id"].as_i64().expect("id should be a number");

    let path = format!("/todo-lists/{id}");
    let (status, fetched) = call(&state, "GET", &path, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["description"], "milk, eggs");
    assert!(fetched["data"]["scheduled_at"].is_string());

    let (status, listed) = call(&state, "GET", "/todo-lists", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    let lists = listed["data"].as_array().expect("data should be a list");
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0]["id"], id);
}

#[tokio::test]
async fn listing_is_scoped_to_the_caller() {
    let state = state().await;
    let (_, alice) = user(&state, "alice@example.com").await;
    let (_, bob) = user(&state, "bob@example.com").await;

    for title in ["First", "Second"] {
        let (status, _) = create(&state, &alice, json!({ "title": title })).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = create(&state, &bob, json!({ "title": "Bob's" })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = call(&state, "GET", "/todo-lists", Some(&alice), None).await;
    let titles: Vec<&str> = listed["data"]
        .as_array()
        .expect("data should be a list")
        .iter()
        .filter_map(|list| list["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[tokio::test]
async fn update_replaces_fields_and_returns_empty_data() {
    let state = state().await;
    let (owner_id, bearer) = user(&state, "alice@example.com").await;
    let (_, created) = create(
        &state,
        &bearer,
        json!({ "title": "Draft", "description": "old", "scheduled_at": "2026-03-01T09:30:00Z" }),
    )
    .await;
    let id = created["data"]["id"].as_i64().expect("id should be a number");

    let (status, updated) = call(
        &state,
        "PUT",
        &format!("/todo-lists/{id}"),
        Some(&bearer),
        Some(json!({ "title": "Final" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], "Success");
    assert!(updated["data"].is_null());

    let (_, fetched) = call(&state, "GET", &format!("/todo-lists/{id}"), Some(&bearer), None).await;
    assert_eq!(fetched["data"]["title"], "Final");
    assert_eq!(fetched["data"]["description"], "");
    assert!(fetched["data"]["scheduled_at"].is_null());
    assert_eq!(fetched["data"]["owner_id"], owner_id);
}

#[tokio::test]
async fn delete_then_get_reports_not_found() {
    let state = state().await;
    let (_, bearer) = user(&state, "alice@example.com").await;
    let (_, created) = create(&state, &bearer, json!({ "title": "Temporary" })).await;
    let id = created["data"]["id"].as_i64().expect("id should be a number");
    let path = format!("/todo-lists/{id}");

    let (status, deleted) = call(&state, "DELETE", &path, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(deleted["data"].is_null());

    let (status, missing) = call(&state, "GET", &path, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(missing["error_code"], "NOT_FOUND");

    let (status, again) = call(&state, "DELETE", &path, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(again["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found() {
    let state = state().await;
    let (_, bearer) = user(&state, "alice@example.com").await;

    let (status, body) = call(
        &state,
        "PUT",
        "/todo-lists/999",
        Some(&bearer),
        Some(json!({ "title": "Ghost" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn validation_failures_use_the_error_envelope() {
    let state = state().await;
    let (_, bearer) = user(&state, "alice@example.com").await;

    let (status, body) = create(&state, &bearer, json!({ "title": "   " })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "INVALID_PAYLOAD");
    assert_eq!(body["message"], "title must not be blank");

    let (status, body) = create(&state, &bearer, json!({ "description": "no title" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "title must be between 1 and 255 characters");

    let (status, body) = create(
        &state,
        &bearer,
        json!({ "title": "Bad date", "scheduled_at": "next tuesday" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "INVALID_PAYLOAD");

    let (_, listed) = call(&state, "GET", "/todo-lists", Some(&bearer), None).await;
    assert_eq!(listed["data"], json!([]));
}

#[tokio::test]
async fn non_numeric_id_is_invalid_payload() {
    let state = state().await;
    let (_, bearer) = user(&state, "alice@example.com").await;

    let (status, body) = call(&state, "GET", "/todo-lists/abc", Some(&bearer), None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn requests_without_a_valid_token_are_unauthorized() {
    let state = state().await;

    let (status, body) = call(&state, "GET", "/todo-lists", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "UNAUTHORIZED");

    let (status, _) = call(&state, "GET", "/todo-lists", Some("Bearer not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(
        &state,
        "POST",
        "/todo-lists",
        Some("Basic YWxpY2U6c2VjcmV0"),
        Some(json!({ "title": "Sneaky" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_routes_get_the_json_envelope() {
    let state = state().await;

    let (status, body) = call(&state, "GET", "/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn shutdown_cancels_in_flight_work() {
    let state = state().await;
    let (_, bearer) = user(&state, "alice@example.com").await;
    state.shutdown.cancel();

    let (status, body) = call(&state, "GET", "/todo-lists", Some(&bearer), None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_code"], "REQUEST_CANCELLED");
}
