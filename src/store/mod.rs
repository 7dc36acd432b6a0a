//! Relational persistence for the catalog, the gallery and the visit log.
//!
//! Every read takes an explicit `include_deleted` flag; nothing here relies
//! on a hidden global scope. Writes run their normalization step (timestamps,
//! slugs) in plain code right before the row is saved.

pub mod gallery;
pub mod lifecycle;
pub mod menu;
pub mod visit;

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use thiserror::Error;

use crate::entities::{
    gallery as gallery_entity, gallery_category, gallery_menu_category, menu as menu_entity,
    menu_addon, menu_category, menu_subcategory, menu_variant,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} does not exist or is deleted")]
    MissingParent(String),
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Tables whose rows are hidden by a `deleted_at` stamp instead of being removed.
pub trait SoftDeletable: EntityTrait {
    fn id_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;
}

macro_rules! soft_deletable {
    ($($module:ident),+ $(,)?) => {
        $(
            impl SoftDeletable for $module::Entity {
                fn id_column() -> Self::Column {
                    $module::Column::Id
                }

                fn deleted_at_column() -> Self::Column {
                    $module::Column::DeletedAt
                }
            }
        )+
    };
}

soft_deletable!(
    menu_category,
    menu_subcategory,
    menu_entity,
    menu_variant,
    menu_addon,
    gallery_category,
    gallery_entity,
    gallery_menu_category,
);

pub fn scoped<E: SoftDeletable>(select: Select<E>, include_deleted: bool) -> Select<E> {
    if include_deleted {
        select
    } else {
        select.filter(E::deleted_at_column().is_null())
    }
}

pub async fn find<E, C>(db: &C, id: i32, include_deleted: bool) -> Result<Option<E::Model>, DbErr>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    scoped(E::find(), include_deleted)
        .filter(E::id_column().eq(id))
        .one(db)
        .await
}

pub async fn list<E, C>(db: &C, include_deleted: bool) -> Result<Vec<E::Model>, DbErr>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    scoped(E::find(), include_deleted)
        .order_by_asc(E::id_column())
        .all(db)
        .await
}

pub(crate) async fn require_live<E, C>(db: &C, id: i32, label: &str) -> Result<(), StoreError>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    match find::<E, C>(db, id, false).await? {
        Some(_) => Ok(()),
        None => Err(StoreError::MissingParent(format!("{label} {id}"))),
    }
}

/// Ids of rows whose `parent_column` points at one of `parent_ids`.
pub(crate) async fn child_ids<E, C>(
    db: &C,
    parent_column: E::Column,
    parent_ids: &[i32],
    deleted: DeletedFilter,
) -> Result<Vec<i32>, DbErr>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    if parent_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut select = E::find()
        .select_only()
        .column(E::id_column())
        .filter(parent_column.is_in(parent_ids.iter().copied()));
    select = match deleted {
        DeletedFilter::Any => select,
        DeletedFilter::Live => select.filter(E::deleted_at_column().is_null()),
        DeletedFilter::At(at) => select.filter(E::deleted_at_column().eq(at)),
    };
    select.into_tuple::<i32>().all(db).await
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum DeletedFilter {
    Any,
    Live,
    At(DateTime<Utc>),
}

/// Stamps `deleted_at` on the live rows among `ids`.
pub(crate) async fn stamp_deleted<E, C>(db: &C, ids: &[i32], at: DateTime<Utc>) -> Result<u64, DbErr>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(0);
    }
    let result = E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(at))
        .filter(E::id_column().is_in(ids.iter().copied()))
        .filter(E::deleted_at_column().is_null())
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Clears `deleted_at` on the rows among `ids` that were stamped at `at`.
pub(crate) async fn clear_deleted<E, C>(db: &C, ids: &[i32], at: DateTime<Utc>) -> Result<u64, DbErr>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(0);
    }
    let result = E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(Option::<DateTime<Utc>>::None))
        .filter(E::id_column().is_in(ids.iter().copied()))
        .filter(E::deleted_at_column().eq(at))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub(crate) async fn remove<E, C>(db: &C, ids: &[i32]) -> Result<u64, DbErr>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(0);
    }
    let result = E::delete_many()
        .filter(E::id_column().is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
