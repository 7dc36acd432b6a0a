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
use crate::entities::gallery_menu_category::{self, Entity as GalleryMenuCategoryEntity};
use crate::error::{ApiError, ApiResult};
use crate::store::{self, lifecycle::ContentKind, gallery::ThumbnailForm};

pub fn admin_gallery_menu_category_router() -> Router {
    Router::new()
        .route("/gallery-menu-categories", get(list_gallery_menu_categories).post(create_gallery_menu_category))
        .route(
            "/gallery-menu-categories/:id",
            get(get_gallery_menu_category)
                .put(update_gallery_menu_category)
                .merge(soft_delete_route(ContentKind::GalleryMenuCategory)),
        )
        .merge(lifecycle_router(ContentKind::GalleryMenuCategory))
}

async fn list_gallery_menu_categories(
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Vec<gallery_menu_category::Model>>> {
    let rows = store::list::<GalleryMenuCategoryEntity, _>(&*db, params.include_deleted).await?;
    Ok(Json(rows))
}

async fn get_gallery_menu_category(
    Path(id): Path<i32>,
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<gallery_menu_category::Model>> {
    store::find::<GalleryMenuCategoryEntity, _>(&*db, id, params.include_deleted)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Menu category image {id}")))
}

async fn create_gallery_menu_category(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<ThumbnailForm>,
) -> ApiResult<(StatusCode, Json<gallery_menu_category::Model>)> {
    payload.validate()?;
    let txn = db.begin().await?;
    let thumbnail = store::gallery::create_thumbnail(&txn, payload).await?;
    txn.commit().await?;
    info!(id = thumbnail.id, "Created menu category image");
    Ok((StatusCode::CREATED, Json(thumbnail)))
}

async fn update_gallery_menu_category(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<ThumbnailForm>,
) -> ApiResult<Json<gallery_menu_category::Model>> {
    payload.validate()?;
    let txn = db.begin().await?;
    let thumbnail = store::gallery::update_thumbnail(&txn, id, payload).await?;
    txn.commit().await?;
    info!(id, "Updated menu category image");
    Ok(Json(thumbnail))
}
