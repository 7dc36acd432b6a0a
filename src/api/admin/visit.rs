use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    routing::get,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::store::visit::{list_visits, VisitPage};

pub fn admin_visit_router() -> Router {
    Router::new().route("/visits", get(get_visits))
}

#[derive(Deserialize)]
struct VisitsQuery {
    page: Option<u64>,
    page_size: Option<u64>,
}

async fn get_visits(
    Query(params): Query<VisitsQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<VisitPage>> {
    let page = list_visits(&*db, params.page.unwrap_or(1), params.page_size.unwrap_or(25)).await?;
    Ok(Json(page))
}
