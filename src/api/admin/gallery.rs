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
use crate::entities::gallery::{self, Entity as GalleryEntity};
use crate::error::{ApiError, ApiResult};
use crate::store::{self, lifecycle::ContentKind, gallery::GalleryForm};

pub fn admin_gallery_router() -> Router {
    Router::new()
        .route("/galleries", get(list_galleries).post(create_gallery))
        .route(
            "/galleries/:id",
            get(get_gallery)
                .put(update_gallery)
                .merge(soft_delete_route(ContentKind::Gallery)),
        )
        .merge(lifecycle_router(ContentKind::Gallery))
}

async fn list_galleries(
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Vec<gallery::Model>>> {
    let rows = store::list::<GalleryEntity, _>(&*db, params.include_deleted).await?;
    Ok(Json(rows))
}

async fn get_gallery(
    Path(id): Path<i32>,
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<gallery::Model>> {
    store::find::<GalleryEntity, _>(&*db, id, params.include_deleted)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Gallery {id}")))
}

async fn create_gallery(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<GalleryForm>,
) -> ApiResult<(StatusCode, Json<gallery::Model>)> {
    payload.validate()?;
    let txn = db.begin().await?;
    let gallery = store::gallery::create_gallery(&txn, payload).await?;
    txn.commit().await?;
    info!(id = gallery.id, "Created gallery");
    Ok((StatusCode::CREATED, Json(gallery)))
}

async fn update_gallery(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<GalleryForm>,
) -> ApiResult<Json<gallery::Model>> {
    payload.validate()?;
    let txn = db.begin().await?;
    let gallery = store::gallery::update_gallery(&txn, id, payload).await?;
    txn.commit().await?;
    info!(id, "Updated gallery");
    Ok(Json(gallery))
}
