use axum::{extract::Path, http::StatusCode, routing::get, Router};

use crate::error::ApiError;

pub fn debug_router() -> Router {
    Router::new().route("/test-error/:code", get(test_error))
}

/// Fails on purpose with the requested status, to preview error pages.
async fn test_error(Path(code): Path<String>) -> ApiError {
    let status = code.parse::<u16>().ok().map(StatusCode::from_u16);
    match status {
        Some(Ok(status)) if status.is_client_error() || status.is_server_error() => {
            ApiError::Status(status)
        }
        _ => ApiError::NotFound(format!("Error code {code}")),
    }
}
