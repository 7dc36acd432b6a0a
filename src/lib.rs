pub mod api;
pub mod assets;
pub mod catalog;
pub mod config;
pub mod entities;
pub mod error;
pub mod middleware;
pub mod slug;
pub mod store;

use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    Extension, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

use crate::api::create_api_router;
use crate::config::Config;
use crate::middleware::{
    error_pages::error_pages_middleware,
    logging::logging_middleware,
    visits::{visit_middleware, DbVisitRecorder, VisitQueue, VisitRecorder, DEFAULT_QUEUE_CAPACITY},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<Config>,
    pub visits: Arc<dyn VisitRecorder>,
}

impl AppState {
    /// State that records visits into the same database.
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        AppState {
            visits: Arc::new(DbVisitRecorder::new(db.clone())),
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }
}

/// Builds the router and starts the visit writer task.
pub fn create_app(state: AppState) -> Router {
    let pages_dir = Arc::new(state.config.error_pages_dir.clone());
    let visits = VisitQueue::spawn(state.visits, DEFAULT_QUEUE_CAPACITY);

    create_api_router()
        .layer(Extension(state.db))
        .layer(Extension(state.config))
        .layer(from_fn_with_state(visits, visit_middleware))
        .layer(from_fn_with_state(pages_dir, error_pages_middleware))
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
