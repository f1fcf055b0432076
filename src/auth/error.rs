use sea_orm::DbErr;

use crate::db::dao::DaoLayerError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidPayload(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User already exists")]
    EmailTaken,
    #[error("Invalid or expired token: {0}")]
    InvalidToken(String),
    #[error("Token issuing failed: {0}")]
    Issue(String),
    #[error("Storage failure: {0}")]
    Storage(#[source] DbErr),
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<DaoLayerError> for AuthError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::Db(err) => AuthError::Storage(err),
            // Only lookups by id can miss, and a token for a deleted user is just invalid.
            DaoLayerError::NotFound { .. } => AuthError::InvalidCredentials,
            DaoLayerError::Cancelled => AuthError::Cancelled,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AuthError::InvalidToken(err.to_string())
    }
}
