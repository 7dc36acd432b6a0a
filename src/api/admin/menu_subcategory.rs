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
use crate::entities::menu_subcategory::{self, Entity as MenuSubcategoryEntity};
use crate::error::{ApiError, ApiResult};
use crate::store::{self, lifecycle::ContentKind, menu::MenuSubcategoryForm};

pub fn admin_menu_subcategory_router() -> Router {
    Router::new()
        .route("/menu-subcategories", get(list_menu_subcategories).post(create_menu_subcategory))
        .route(
            "/menu-subcategories/:id",
            get(get_menu_subcategory)
                .put(update_menu_subcategory)
                .merge(soft_delete_route(ContentKind::MenuSubcategory)),
        )
        .merge(lifecycle_router(ContentKind::MenuSubcategory))
}

async fn list_menu_subcategories(
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Vec<menu_subcategory::Model>>> {
    let rows = store::list::<MenuSubcategoryEntity, _>(&*db, params.include_deleted).await?;
    Ok(Json(rows))
}

async fn get_menu_subcategory(
    Path(id): Path<i32>,
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<menu_subcategory::Model>> {
    store::find::<MenuSubcategoryEntity, _>(&*db, id, params.include_deleted)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Menu subcategory {id}")))
}

async fn create_menu_subcategory(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<MenuSubcategoryForm>,
) -> ApiResult<(StatusCode, Json<menu_subcategory::Model>)> {
    payload.validate()?;
    let txn = db.begin().await?;
    let subcategory = store::menu::create_subcategory(&txn, payload).await?;
    txn.commit().await?;
    info!(id = subcategory.id, slug = %subcategory.slug, "Created menu subcategory");
    Ok((StatusCode::CREATED, Json(subcategory)))
}

async fn update_menu_subcategory(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<MenuSubcategoryForm>,
) -> ApiResult<Json<menu_subcategory::Model>> {
    payload.validate()?;
    let txn = db.begin().await?;
    let subcategory = store::menu::update_subcategory(&txn, id, payload).await?;
    txn.commit().await?;
    info!(id, slug = %subcategory.slug, "Updated menu subcategory");
    Ok(Json(subcategory))
}
