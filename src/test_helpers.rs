use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;

use crate::{
    auth::jwt::{encode_token, make_access_claims},
    config::{AppConfig, AuthConfig, DatabaseConfig},
    db::connection,
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test-secret";

/// A private in-memory SQLite database with the full schema.
///
/// The pool holds a single connection; every connection to `sqlite::memory:` would
/// otherwise see its own empty database.
pub async fn memory_db() -> anyhow::Result<DatabaseConnection> {
    let cfg = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_idle: 1,
        lock_timeout_ms: 0,
    };
    connection::connect(&cfg).await
}

/// Application state over [`memory_db`], signing tokens with [`TEST_JWT_SECRET`].
pub async fn test_state() -> anyhow::Result<Arc<AppState>> {
    let db = memory_db().await?;
    let mut cfg = AppConfig::default();
    cfg.database.url = "sqlite::memory:".to_string();
    cfg.auth = Some(AuthConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        access_ttl_secs: 3600,
    });
    AppState::new(cfg, db, CancellationToken::new())
}

/// `Authorization` header value for `user_id`, without going through login.
pub fn bearer_for(state: &AppState, user_id: i64) -> anyhow::Result<String> {
    let claims = make_access_claims(user_id, state.auth.access_ttl_secs);
    let token = encode_token(&state.jwt, &claims)?;
    Ok(format!("Bearer {token}"))
}
