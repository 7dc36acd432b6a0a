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
use crate::entities::menu_variant::{self, Entity as MenuVariantEntity};
use crate::error::{ApiError, ApiResult};
use crate::store::{self, lifecycle::ContentKind, menu::MenuVariantForm};

pub fn admin_menu_variant_router() -> Router {
    Router::new()
        .route("/menu-variants", get(list_menu_variants).post(create_menu_variant))
        .route(
            "/menu-variants/:id",
            get(get_menu_variant)
                .put(update_menu_variant)
                .merge(soft_delete_route(ContentKind::MenuVariant)),
        )
        .merge(lifecycle_router(ContentKind::MenuVariant))
}

async fn list_menu_variants(
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Vec<menu_variant::Model>>> {
    let rows = store::list::<MenuVariantEntity, _>(&*db, params.include_deleted).await?;
    Ok(Json(rows))
}

async fn get_menu_variant(
    Path(id): Path<i32>,
    Query(params): Query<ReadQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<menu_variant::Model>> {
    store::find::<MenuVariantEntity, _>(&*db, id, params.include_deleted)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Menu variant {id}")))
}

async fn create_menu_variant(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<MenuVariantForm>,
) -> ApiResult<(StatusCode, Json<menu_variant::Model>)> {
    payload.validate()?;
    let txn = db.begin().await?;
    let variant = store::menu::create_variant(&txn, payload).await?;
    txn.commit().await?;
    info!(id = variant.id, "Created menu variant");
    Ok((StatusCode::CREATED, Json(variant)))
}

async fn update_menu_variant(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<MenuVariantForm>,
) -> ApiResult<Json<menu_variant::Model>> {
    payload.validate()?;
    let txn = db.begin().await?;
    let variant = store::menu::update_variant(&txn, id, payload).await?;
    txn.commit().await?;
    info!(id, "Updated menu variant");
    Ok(Json(variant))
}
