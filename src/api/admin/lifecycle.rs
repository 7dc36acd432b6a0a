//! Delete, restore, force delete and bulk delete for every content kind.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    routing::{delete, post, MethodRouter},
    Json, Router,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::store::lifecycle::{self, ContentKind};

type Db = Extension<Arc<DatabaseConnection>>;

/// `DELETE /<kind>/:id`, to be chained onto the member route of `kind`.
pub fn soft_delete_route(kind: ContentKind) -> MethodRouter {
    delete(move |Extension(db): Db, Path(id): Path<i32>| async move {
        soft_delete(kind, db, id).await
    })
}

pub fn lifecycle_router(kind: ContentKind) -> Router {
    let base = format!("/{}", kind.as_str());
    Router::new()
        .route(
            &format!("{base}/:id/restore"),
            post(move |Extension(db): Db, Path(id): Path<i32>| async move {
                restore(kind, db, id).await
            }),
        )
        .route(
            &format!("{base}/:id/force"),
            delete(move |Extension(db): Db, Path(id): Path<i32>| async move {
                force_delete(kind, db, id).await
            }),
        )
        .route(
            &format!("{base}/bulk-delete"),
            post(move |Extension(db): Db, Json(payload): Json<BulkDelete>| async move {
                bulk_delete(kind, db, payload).await
            }),
        )
}

async fn soft_delete(kind: ContentKind, db: Arc<DatabaseConnection>, id: i32) -> ApiResult<Json<Value>> {
    let txn = db.begin().await?;
    if !lifecycle::exists(&txn, kind, id).await? {
        return Err(ApiError::NotFound(format!("{} {id}", kind.label())));
    }
    let deleted = lifecycle::soft_delete(&txn, kind, &[id]).await?;
    txn.commit().await?;
    info!(kind = %kind, id, deleted, "Soft deleted");
    Ok(Json(json!({ "deleted": deleted })))
}

async fn restore(kind: ContentKind, db: Arc<DatabaseConnection>, id: i32) -> ApiResult<Json<Value>> {
    let txn = db.begin().await?;
    let restored = lifecycle::restore(&txn, kind, id).await?;
    txn.commit().await?;
    info!(kind = %kind, id, restored, "Restore requested");
    Ok(Json(json!({ "restored": restored })))
}

async fn force_delete(kind: ContentKind, db: Arc<DatabaseConnection>, id: i32) -> ApiResult<Json<Value>> {
    let txn = db.begin().await?;
    if !lifecycle::exists(&txn, kind, id).await? {
        return Err(ApiError::NotFound(format!("{} {id}", kind.label())));
    }
    let deleted = lifecycle::force_delete(&txn, kind, &[id]).await?;
    txn.commit().await?;
    info!(kind = %kind, id, deleted, "Force deleted");
    Ok(Json(json!({ "deleted": deleted })))
}

#[derive(Debug, Deserialize)]
struct BulkDelete {
    ids: Vec<i32>,
    #[serde(default)]
    force: bool,
}

async fn bulk_delete(
    kind: ContentKind,
    db: Arc<DatabaseConnection>,
    payload: BulkDelete,
) -> ApiResult<Json<Value>> {
    if payload.ids.is_empty() {
        return Err(ApiError::BadRequest("No ids given".into()));
    }
    let txn = db.begin().await?;
    let deleted = if payload.force {
        lifecycle::force_delete(&txn, kind, &payload.ids).await?
    } else {
        lifecycle::soft_delete(&txn, kind, &payload.ids).await?
    };
    txn.commit().await?;
    info!(kind = %kind, requested = payload.ids.len(), deleted, force = payload.force, "Bulk deleted");
    Ok(Json(json!({ "deleted": deleted })))
}
