use std::borrow::Cow;

use axum::http::StatusCode;

use crate::{auth::AuthError, services::ServiceError};

const GENERIC_FAILURE: &str = "Internal server error";

/// Every failure an HTTP handler can return.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Internal(String),
    /// A plain error response produced outside the handlers, e.g. by the router.
    #[error("{message}")]
    Status { status: StatusCode, message: String },
}

/// What the client sees for an [`AppError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorParts {
    pub status: StatusCode,
    pub error_code: Cow<'static, str>,
    pub message: String,
}

impl ErrorParts {
    fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error_code: Cow::Borrowed(error_code),
            message: message.into(),
        }
    }
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn parts(&self) -> ErrorParts {
        use StatusCode as S;

        match self {
            AppError::Unauthorized(message) => {
                ErrorParts::new(S::UNAUTHORIZED, "UNAUTHORIZED", message)
            }
            AppError::InvalidPayload(message) => {
                ErrorParts::new(S::UNPROCESSABLE_ENTITY, "INVALID_PAYLOAD", message)
            }
            AppError::Service(err) => match err {
                ServiceError::InvalidPayload(message) => {
                    ErrorParts::new(S::UNPROCESSABLE_ENTITY, "INVALID_PAYLOAD", message)
                }
                ServiceError::NotFound { .. } => {
                    ErrorParts::new(S::UNPROCESSABLE_ENTITY, "NOT_FOUND", err.to_string())
                }
                ServiceError::Storage(_) => {
                    ErrorParts::new(S::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", GENERIC_FAILURE)
                }
                ServiceError::Cancelled => {
                    ErrorParts::new(
                        S::INTERNAL_SERVER_ERROR,
                        "REQUEST_CANCELLED",
                        "Request cancelled",
                    )
                }
            },
            AppError::Auth(err) => match err {
                AuthError::InvalidPayload(message) => {
                    ErrorParts::new(S::UNPROCESSABLE_ENTITY, "INVALID_PAYLOAD", message)
                }
                AuthError::InvalidCredentials => {
                    ErrorParts::new(S::UNAUTHORIZED, "INVALID_CREDENTIALS", err.to_string())
                }
                AuthError::EmailTaken => {
                    ErrorParts::new(S::UNPROCESSABLE_ENTITY, "EMAIL_TAKEN", err.to_string())
                }
                AuthError::InvalidToken(_) => {
                    ErrorParts::new(S::UNAUTHORIZED, "UNAUTHORIZED", "Invalid or expired token")
                }
                AuthError::Issue(_) => {
                    ErrorParts::new(S::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", GENERIC_FAILURE)
                }
                AuthError::Storage(_) => {
                    ErrorParts::new(S::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", GENERIC_FAILURE)
                }
                AuthError::Cancelled => {
                    ErrorParts::new(
                        S::INTERNAL_SERVER_ERROR,
                        "REQUEST_CANCELLED",
                        "Request cancelled",
                    )
                }
            },
            AppError::Internal(_) => {
                ErrorParts::new(S::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", GENERIC_FAILURE)
            }
            AppError::Status { status, message } => ErrorParts {
                status: *status,
                error_code: Cow::Owned(code_for_status(*status)),
                message: message.clone(),
            },
        }
    }
}

/// `405 Method Not Allowed` becomes `METHOD_NOT_ALLOWED`.
fn code_for_status(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_ascii_uppercase()
        .replace([' ', '-'], "_")
}
