use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::info;
use validator::Validate;

use super::lifecycle::{lifecycle_router, soft_delete_route};
use super::ReadQuery;
use crate::entities::gallery_category::{self, Entity as GalleryCategoryEntity};
use crate::error::{ApiError, ApiResult};
use crate::store::{self, lifecycle::ContentKind, gallery::GalleryCategoryForm};

pub fn admin_gallery_category_router() -> Router {
    Router::new()
        .route("/gallery-categories", get(list_gallery_categories).post(create_gallery_category))
        .route(
            "/gallery-categories/:id",
            get(get_gallery_category)
                .put(update_gallery_category)
                .merge(soft_delete_route(ContentKind::GalleryCategory)),
        )
        .merge(lifecycle_router(ContentKind::GalleryCategory))
}

async fn list_gallery_categories(
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Vec<gallery_category::Model>>> {
    let rows = store::list::<GalleryCategoryEntity, _>(&*db, params.include_deleted).await?;
    Ok(Json(rows))
}

async fn get_gallery_category(
    Path(id): Path<i32>,
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<gallery_category::Model>> {
    store::find::<GalleryCategoryEntity, _>(&*db, id, params.include_deleted)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Gallery category {id}")))
}

async fn create_gallery_category(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<GalleryCategoryForm>,
) -> ApiResult<(StatusCode, Json<gallery_category::Model>)> {
    payload.validate()?;
    let txn = db.begin().await?;
    let category = store::gallery::create_category(&txn, payload).await?;
    txn.commit().await?;
    info!(id = category.id, slug = %category.slug, "Created gallery category");
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_gallery_category(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<GalleryCategoryForm>,
) -> ApiResult<Json<gallery_category::Model>> {
    payload.validate()?;
    let txn = db.begin().await?;
    let category = store::gallery::update_category(&txn, id, payload).await?;
    txn.commit().await?;
    info!(id, slug = %category.slug, "Updated gallery category");
    Ok(Json(category))
}
