use std::sync::Arc;

use axum::{Router, extract::State, routing::post};
use serde::Deserialize;

use crate::{
    auth::TokenBundle,
    extract::JsonBody,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<CredentialsRequest>,
) -> ApiResult<TokenBundle> {
    let service = ServiceContext::from_state(state.as_ref()).auth();
    let tokens = service
        .register(&state.request_token(), &body.email, &body.password)
        .await?;
    JsonApiResponse::ok(tokens)
}

async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<CredentialsRequest>,
) -> ApiResult<TokenBundle> {
    let service = ServiceContext::from_state(state.as_ref()).auth();
    let tokens = service
        .login(&state.request_token(), &body.email, &body.password)
        .await?;
    JsonApiResponse::ok(tokens)
}
