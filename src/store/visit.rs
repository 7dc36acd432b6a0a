use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use serde::Serialize;

use crate::entities::visit;

/// Request metadata captured by the visit middleware.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisitMetadata {
    pub ip_address: String,
    pub user_agent: String,
    pub url: String,
    pub referrer: Option<String>,
    pub path: String,
}

pub async fn record_visit<C: ConnectionTrait>(
    db: &C,
    visit: VisitMetadata,
) -> Result<visit::Model, DbErr> {
    let now = Utc::now();
    visit::ActiveModel {
        ip_address: Set(visit.ip_address),
        user_agent: Set(visit.user_agent),
        url: Set(visit.url),
        referrer: Set(visit.referrer),
        path: Set(visit.path),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

#[derive(Debug, Serialize)]
pub struct VisitPage {
    pub visits: Vec<visit::Model>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
}

/// Newest first. `page` starts at 1.
pub async fn list_visits<C: ConnectionTrait>(
    db: &C,
    page: u64,
    page_size: u64,
) -> Result<VisitPage, DbErr> {
    let page = page.max(1);
    let page_size = page_size.clamp(1, 100);
    let paginator = visit::Entity::find()
        .order_by_desc(visit::Column::Id)
        .paginate(db, page_size);
    let total = paginator.num_items().await?;
    let visits = paginator.fetch_page(page - 1).await?;
    Ok(VisitPage {
        visits,
        page,
        page_size,
        total,
    })
}
