use axum::{
    body::to_bytes,
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

const ERROR_BODY_LIMIT: usize = 16 * 1024;

/// Wraps error responses that are not JSON yet (unknown route, wrong method) in the
/// `{error_code, message}` envelope. Handler errors already are and pass through.
pub async fn json_error_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let status = response.status();
    if status.is_success() || status.is_informational() || status.is_redirection() {
        return response;
    }
    if response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(is_json)
    {
        return response;
    }

    let (original, body) = response.into_parts();
    let text = to_bytes(body, ERROR_BODY_LIMIT)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_owned())
        .unwrap_or_default();
    let message = if text.is_empty() {
        status.canonical_reason().unwrap_or("Request failed").to_owned()
    } else {
        text
    };

    let mut wrapped = AppError::Status { status, message }.into_response();
    for (name, value) in &original.headers {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            wrapped.headers_mut().insert(name.clone(), value.clone());
        }
    }
    wrapped
}

fn is_json(value: &HeaderValue) -> bool {
    value.to_str().is_ok_and(|value| {
        let value = value.to_ascii_lowercase();
        value.starts_with("application/json") || value.contains("+json")
    })
}
