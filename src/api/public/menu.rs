use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    routing::get,
    Json, Router,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::debug;

use crate::catalog::{self, MenuFilter, MenuListing};
use crate::error::ApiResult;

pub fn menu_router() -> Router {
    Router::new().route("/menu", get(get_menu))
}

async fn get_menu(
    Query(filter): Query<MenuFilter>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<MenuListing>> {
    let txn = db.begin().await?;
    let listing = catalog::menu_listing(&txn, &filter).await?;
    txn.commit().await?;
    debug!(
        category = ?listing.selected_category.as_ref().map(|c| c.id),
        subcategory = ?listing.selected_subcategory.as_ref().map(|s| s.id),
        menus = listing.menus.len(),
        "Resolved menu listing"
    );
    Ok(Json(listing))
}
