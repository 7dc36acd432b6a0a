use std::sync::Arc;

use axum::{extract::Extension, routing::get, Json, Router};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::catalog::{self, Homepage};
use crate::error::ApiResult;

pub fn home_router() -> Router {
    Router::new().route("/", get(get_homepage))
}

async fn get_homepage(Extension(db): Extension<Arc<DatabaseConnection>>) -> ApiResult<Json<Homepage>> {
    let txn = db.begin().await?;
    let homepage = catalog::homepage(&txn).await?;
    txn.commit().await?;
    Ok(Json(homepage))
}
