pub mod admin;
pub mod public;

use axum::Router;

use admin::admin_api_router;
use public::public_router;

use crate::error::ApiError;

pub fn create_api_router() -> Router {
    Router::new()
        .merge(public_router())
        .nest("/admin", admin_api_router())
        .fallback(|| async { ApiError::NotFound("Page".to_string()) })
}
