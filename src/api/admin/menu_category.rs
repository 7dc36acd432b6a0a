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
use crate::entities::menu_category::{self, Entity as MenuCategoryEntity};
use crate::error::{ApiError, ApiResult};
use crate::store::{self, lifecycle::ContentKind, menu::MenuCategoryForm};

pub fn admin_menu_category_router() -> Router {
    Router::new()
        .route("/menu-categories", get(list_menu_categories).post(create_menu_category))
        .route(
            "/menu-categories/:id",
            get(get_menu_category)
                .put(update_menu_category)
                .merge(soft_delete_route(ContentKind::MenuCategory)),
        )
        .merge(lifecycle_router(ContentKind::MenuCategory))
}

async fn list_menu_categories(
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Vec<menu_category::Model>>> {
    let rows = store::list::<MenuCategoryEntity, _>(&*db, params.include_deleted).await?;
    Ok(Json(rows))
}

async fn get_menu_category(
    Path(id): Path<i32>,
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<menu_category::Model>> {
    store::find::<MenuCategoryEntity, _>(&*db, id, params.include_deleted)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Menu category {id}")))
}

async fn create_menu_category(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<MenuCategoryForm>,
) -> ApiResult<(StatusCode, Json<menu_category::Model>)> {
    payload.validate()?;
    let txn = db.begin().await?;
    let category = store::menu::create_category(&txn, payload).await?;
    txn.commit().await?;
    info!(id = category.id, slug = %category.slug, "Created menu category");
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_menu_category(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<MenuCategoryForm>,
) -> ApiResult<Json<menu_category::Model>> {
    payload.validate()?;
    let txn = db.begin().await?;
    let category = store::menu::update_category(&txn, id, payload).await?;
    txn.commit().await?;
    info!(id, slug = %category.slug, "Updated menu category");
    Ok(Json(category))
}
