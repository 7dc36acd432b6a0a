use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    routing::get,
    Json, Router,
};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::catalog::{self, GalleryFilter, GalleryListing};
use crate::error::ApiResult;

pub fn gallery_router() -> Router {
    Router::new().route("/gallery", get(get_gallery))
}

async fn get_gallery(
    Query(filter): Query<GalleryFilter>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<GalleryListing>> {
    let txn = db.begin().await?;
    let listing = catalog::gallery_listing(&txn, &filter).await?;
    txn.commit().await?;
    Ok(Json(listing))
}
