use std::sync::Arc;

use anyhow::Context;
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;

use crate::{
    auth::JwtKeys,
    config::{AppConfig, AuthConfig},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub auth: AuthConfig,
    pub db: DatabaseConnection,
    pub jwt: JwtKeys,
    /// Cancelled when the server starts shutting down.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Fails when the `auth` section is missing; the API cannot run without it.
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        shutdown: CancellationToken,
    ) -> anyhow::Result<Arc<Self>> {
        let auth = config
            .auth
            .clone()
            .context("auth config is required (set APP_AUTH__JWT_SECRET)")?;
        let jwt = JwtKeys::from_secret(auth.jwt_secret.as_bytes());

        Ok(Arc::new(Self {
            config,
            auth,
            db,
            jwt,
            shutdown,
        }))
    }

    /// A token for one request; cancelled on its own or together with the server.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
