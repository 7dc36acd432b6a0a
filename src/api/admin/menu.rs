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
use crate::entities::menu::{self, Entity as MenuEntity};
use crate::error::{ApiError, ApiResult};
use crate::store::{self, lifecycle::ContentKind, menu::MenuForm};

pub fn admin_menu_router() -> Router {
    Router::new()
        .route("/menus", get(list_menus).post(create_menu))
        .route(
            "/menus/:id",
            get(get_menu)
                .put(update_menu)
                .merge(soft_delete_route(ContentKind::Menu)),
        )
        .merge(lifecycle_router(ContentKind::Menu))
}

async fn list_menus(
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Vec<menu::Model>>> {
    let rows = store::list::<MenuEntity, _>(&*db, params.include_deleted).await?;
    Ok(Json(rows))
}

async fn get_menu(
    Path(id): Path<i32>,
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<menu::Model>> {
    store::find::<MenuEntity, _>(&*db, id, params.include_deleted)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Menu {id}")))
}

async fn create_menu(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<MenuForm>,
) -> ApiResult<(StatusCode, Json<menu::Model>)> {
    payload.validate()?;
    let txn = db.begin().await?;
    let menu = store::menu::create_menu(&txn, payload).await?;
    txn.commit().await?;
    info!(id = menu.id, "Created menu");
    Ok((StatusCode::CREATED, Json(menu)))
}

async fn update_menu(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<MenuForm>,
) -> ApiResult<Json<menu::Model>> {
    payload.validate()?;
    let txn = db.begin().await?;
    let menu = store::menu::update_menu(&txn, id, payload).await?;
    txn.commit().await?;
    info!(id, "Updated menu");
    Ok(Json(menu))
}
