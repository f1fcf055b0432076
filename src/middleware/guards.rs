use std::sync::Arc;

use axum::{extract::FromRequestParts, http::header, http::request::Parts};

use crate::{
    auth::{Claims, jwt::decode_token},
    error::AppError,
    state::AppState,
};

/// The authenticated caller. Its `owner_id` owns every list it creates.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub owner_id: i64,
    pub claims: Claims,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>().cloned() {
            return Ok(user);
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthorized("Missing/invalid Authorization header"))?;

        let claims = decode_token(&state.jwt, token)?;
        let owner_id = claims
            .user_id()
            .ok_or_else(|| AppError::unauthorized("Token subject is not a user id"))?;

        let user = AuthUser { owner_id, claims };
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
