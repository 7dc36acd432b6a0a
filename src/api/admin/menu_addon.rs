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
use crate::entities::menu_addon::{self, Entity as MenuAddonEntity};
use crate::error::{ApiError, ApiResult};
use crate::store::{self, lifecycle::ContentKind, menu::MenuAddonForm};

pub fn admin_menu_addon_router() -> Router {
    Router::new()
        .route("/menu-addons", get(list_menu_addons).post(create_menu_addon))
        .route(
            "/menu-addons/:id",
            get(get_menu_addon)
                .put(update_menu_addon)
                .merge(soft_delete_route(ContentKind::MenuAddon)),
        )
        .merge(lifecycle_router(ContentKind::MenuAddon))
}

async fn list_menu_addons(
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Vec<menu_addon::Model>>> {
    let rows = store::list::<MenuAddonEntity, _>(&*db, params.include_deleted).await?;
    Ok(Json(rows))
}

async fn get_menu_addon(
    Path(id): Path<i32>,
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<menu_addon::Model>> {
    store::find::<MenuAddonEntity, _>(&*db, id, params.include_deleted)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Menu addon {id}")))
}

async fn create_menu_addon(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<MenuAddonForm>,
) -> ApiResult<(StatusCode, Json<menu_addon::Model>)> {
    payload.validate()?;
    let txn = db.begin().await?;
    let addon = store::menu::create_addon(&txn, payload).await?;
    txn.commit().await?;
    info!(id = addon.id, "Created menu addon");
    Ok((StatusCode::CREATED, Json(addon)))
}

async fn update_menu_addon(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<MenuAddonForm>,
) -> ApiResult<Json<menu_addon::Model>> {
    payload.validate()?;
    let txn = db.begin().await?;
    let addon = store::menu::update_addon(&txn, id, payload).await?;
    txn.commit().await?;
    info!(id, "Updated menu addon");
    Ok(Json(addon))
}
