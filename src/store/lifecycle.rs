//! Soft delete, restore and force delete, including the cascade rules.
//!
//! Cascades:
//! - menu category -> subcategories -> menus -> variants
//! - menu category -> thumbnails
//! - gallery category -> gallery items
//! - menu addon -> nothing; force delete clears `menu_addon_id` instead
//!
//! Restoring a row brings back the descendants that were stamped with the
//! very same `deleted_at`, i.e. the ones removed by the cascade.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
};
use serde::{Deserialize, Serialize};

use super::{
    child_ids, clear_deleted, find, remove, require_live, stamp_deleted, DeletedFilter,
    SoftDeletable, StoreError,
};
use crate::entities::{
    gallery, gallery_category, gallery_menu_category, menu, menu_addon, menu_category,
    menu_subcategory, menu_variant,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "menu-categories")]
    MenuCategory,
    #[serde(rename = "menu-subcategories")]
    MenuSubcategory,
    #[serde(rename = "menus")]
    Menu,
    #[serde(rename = "menu-variants")]
    MenuVariant,
    #[serde(rename = "menu-addons")]
    MenuAddon,
    #[serde(rename = "gallery-categories")]
    GalleryCategory,
    #[serde(rename = "galleries")]
    Gallery,
    #[serde(rename = "gallery-menu-categories")]
    GalleryMenuCategory,
}

impl ContentKind {
    pub const ALL: [ContentKind; 8] = [
        ContentKind::MenuCategory,
        ContentKind::MenuSubcategory,
        ContentKind::Menu,
        ContentKind::MenuVariant,
        ContentKind::MenuAddon,
        ContentKind::GalleryCategory,
        ContentKind::Gallery,
        ContentKind::GalleryMenuCategory,
    ];

    /// Resource name used in admin URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::MenuCategory => "menu-categories",
            ContentKind::MenuSubcategory => "menu-subcategories",
            ContentKind::Menu => "menus",
            ContentKind::MenuVariant => "menu-variants",
            ContentKind::MenuAddon => "menu-addons",
            ContentKind::GalleryCategory => "gallery-categories",
            ContentKind::Gallery => "galleries",
            ContentKind::GalleryMenuCategory => "gallery-menu-categories",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::MenuCategory => "Menu category",
            ContentKind::MenuSubcategory => "Menu subcategory",
            ContentKind::Menu => "Menu",
            ContentKind::MenuVariant => "Menu variant",
            ContentKind::MenuAddon => "Menu addon",
            ContentKind::GalleryCategory => "Gallery category",
            ContentKind::Gallery => "Gallery",
            ContentKind::GalleryMenuCategory => "Menu category image",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown resource: {s}"))
    }
}

/// Whether a row exists at all, deleted or not.
pub async fn exists<C: ConnectionTrait>(db: &C, kind: ContentKind, id: i32) -> Result<bool, DbErr> {
    let found = match kind {
        ContentKind::MenuCategory => find::<menu_category::Entity, C>(db, id, true).await?.is_some(),
        ContentKind::MenuSubcategory => {
            find::<menu_subcategory::Entity, C>(db, id, true).await?.is_some()
        }
        ContentKind::Menu => find::<menu::Entity, C>(db, id, true).await?.is_some(),
        ContentKind::MenuVariant => find::<menu_variant::Entity, C>(db, id, true).await?.is_some(),
        ContentKind::MenuAddon => find::<menu_addon::Entity, C>(db, id, true).await?.is_some(),
        ContentKind::GalleryCategory => {
            find::<gallery_category::Entity, C>(db, id, true).await?.is_some()
        }
        ContentKind::Gallery => find::<gallery::Entity, C>(db, id, true).await?.is_some(),
        ContentKind::GalleryMenuCategory => {
            find::<gallery_menu_category::Entity, C>(db, id, true).await?.is_some()
        }
    };
    Ok(found)
}

/// Soft deletes `ids` of `kind` and their live descendants.
///
/// Returns how many rows of `kind` were stamped; rows already deleted are
/// left alone.
pub async fn soft_delete<C: ConnectionTrait>(
    db: &C,
    kind: ContentKind,
    ids: &[i32],
) -> Result<u64, StoreError> {
    let at = Utc::now();
    let touched = match kind {
        ContentKind::MenuCategory => soft_delete_menu_categories(db, ids, at).await?,
        ContentKind::MenuSubcategory => soft_delete_subcategories(db, ids, at).await?,
        ContentKind::Menu => soft_delete_menus(db, ids, at).await?,
        ContentKind::MenuVariant => stamp_deleted::<menu_variant::Entity, C>(db, ids, at).await?,
        ContentKind::MenuAddon => stamp_deleted::<menu_addon::Entity, C>(db, ids, at).await?,
        ContentKind::GalleryCategory => {
            let touched = stamp_deleted::<gallery_category::Entity, C>(db, ids, at).await?;
            let items = child_ids::<gallery::Entity, C>(
                db,
                gallery::Column::GalleryCategoryId,
                ids,
                DeletedFilter::Live,
            )
            .await?;
            stamp_deleted::<gallery::Entity, C>(db, &items, at).await?;
            touched
        }
        ContentKind::Gallery => stamp_deleted::<gallery::Entity, C>(db, ids, at).await?,
        ContentKind::GalleryMenuCategory => {
            stamp_deleted::<gallery_menu_category::Entity, C>(db, ids, at).await?
        }
    };
    Ok(touched)
}

async fn soft_delete_menu_categories<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
    at: DateTime<Utc>,
) -> Result<u64, StoreError> {
    let touched = stamp_deleted::<menu_category::Entity, C>(db, ids, at).await?;
    let thumbnails = child_ids::<gallery_menu_category::Entity, C>(
        db,
        gallery_menu_category::Column::MenuCategoryId,
        ids,
        DeletedFilter::Live,
    )
    .await?;
    stamp_deleted::<gallery_menu_category::Entity, C>(db, &thumbnails, at).await?;
    let subcategories = child_ids::<menu_subcategory::Entity, C>(
        db,
        menu_subcategory::Column::MenuCategoryId,
        ids,
        DeletedFilter::Live,
    )
    .await?;
    soft_delete_subcategories(db, &subcategories, at).await?;
    Ok(touched)
}

async fn soft_delete_subcategories<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
    at: DateTime<Utc>,
) -> Result<u64, StoreError> {
    let touched = stamp_deleted::<menu_subcategory::Entity, C>(db, ids, at).await?;
    let menus = child_ids::<menu::Entity, C>(
        db,
        menu::Column::MenuSubcategoryId,
        ids,
        DeletedFilter::Live,
    )
    .await?;
    soft_delete_menus(db, &menus, at).await?;
    Ok(touched)
}

async fn soft_delete_menus<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
    at: DateTime<Utc>,
) -> Result<u64, StoreError> {
    let touched = stamp_deleted::<menu::Entity, C>(db, ids, at).await?;
    let variants =
        child_ids::<menu_variant::Entity, C>(db, menu_variant::Column::MenuId, ids, DeletedFilter::Live)
            .await?;
    stamp_deleted::<menu_variant::Entity, C>(db, &variants, at).await?;
    Ok(touched)
}

/// Restores one soft-deleted row together with what its deletion cascaded to.
///
/// Returns `false` when the row was not deleted in the first place. A row
/// whose parent is still deleted cannot be restored.
pub async fn restore<C: ConnectionTrait>(
    db: &C,
    kind: ContentKind,
    id: i32,
) -> Result<bool, StoreError> {
    match kind {
        ContentKind::MenuCategory => {
            let Some(at) = deleted_at::<menu_category::Entity, C>(db, kind, id).await? else {
                return Ok(false);
            };
            restore_menu_category(db, id, at).await?;
        }
        ContentKind::MenuSubcategory => {
            let Some(at) = deleted_at::<menu_subcategory::Entity, C>(db, kind, id).await? else {
                return Ok(false);
            };
            if let Some(row) = find::<menu_subcategory::Entity, C>(db, id, true).await? {
                require_live::<menu_category::Entity, C>(db, row.menu_category_id, "Menu category")
                    .await?;
            }
            restore_subcategories(db, &[id], at).await?;
        }
        ContentKind::Menu => {
            let Some(at) = deleted_at::<menu::Entity, C>(db, kind, id).await? else {
                return Ok(false);
            };
            if let Some(row) = find::<menu::Entity, C>(db, id, true).await? {
                require_live::<menu_subcategory::Entity, C>(
                    db,
                    row.menu_subcategory_id,
                    "Menu subcategory",
                )
                .await?;
            }
            restore_menus(db, &[id], at).await?;
        }
        ContentKind::MenuVariant => {
            let Some(at) = deleted_at::<menu_variant::Entity, C>(db, kind, id).await? else {
                return Ok(false);
            };
            if let Some(row) = find::<menu_variant::Entity, C>(db, id, true).await? {
                require_live::<menu::Entity, C>(db, row.menu_id, "Menu").await?;
            }
            clear_deleted::<menu_variant::Entity, C>(db, &[id], at).await?;
        }
        ContentKind::MenuAddon => {
            let Some(at) = deleted_at::<menu_addon::Entity, C>(db, kind, id).await? else {
                return Ok(false);
            };
            clear_deleted::<menu_addon::Entity, C>(db, &[id], at).await?;
        }
        ContentKind::GalleryCategory => {
            let Some(at) = deleted_at::<gallery_category::Entity, C>(db, kind, id).await? else {
                return Ok(false);
            };
            clear_deleted::<gallery_category::Entity, C>(db, &[id], at).await?;
            let items = child_ids::<gallery::Entity, C>(
                db,
                gallery::Column::GalleryCategoryId,
                &[id],
                DeletedFilter::At(at),
            )
            .await?;
            clear_deleted::<gallery::Entity, C>(db, &items, at).await?;
        }
        ContentKind::Gallery => {
            let Some(at) = deleted_at::<gallery::Entity, C>(db, kind, id).await? else {
                return Ok(false);
            };
            if let Some(row) = find::<gallery::Entity, C>(db, id, true).await? {
                require_live::<gallery_category::Entity, C>(
                    db,
                    row.gallery_category_id,
                    "Gallery category",
                )
                .await?;
            }
            clear_deleted::<gallery::Entity, C>(db, &[id], at).await?;
        }
        ContentKind::GalleryMenuCategory => {
            let Some(at) = deleted_at::<gallery_menu_category::Entity, C>(db, kind, id).await?
            else {
                return Ok(false);
            };
            if let Some(row) = find::<gallery_menu_category::Entity, C>(db, id, true).await? {
                require_live::<menu_category::Entity, C>(db, row.menu_category_id, "Menu category")
                    .await?;
            }
            clear_deleted::<gallery_menu_category::Entity, C>(db, &[id], at).await?;
        }
    }
    Ok(true)
}

/// `deleted_at` of the row, `NotFound` when the id does not exist at all.
async fn deleted_at<E, C>(
    db: &C,
    kind: ContentKind,
    id: i32,
) -> Result<Option<DateTime<Utc>>, StoreError>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    let stamp = E::find()
        .select_only()
        .column(E::deleted_at_column())
        .filter(E::id_column().eq(id))
        .into_tuple::<Option<DateTime<Utc>>>()
        .one(db)
        .await?;
    stamp.ok_or_else(|| StoreError::NotFound(format!("{} {id}", kind.label())))
}

async fn restore_menu_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
    at: DateTime<Utc>,
) -> Result<(), StoreError> {
    clear_deleted::<menu_category::Entity, C>(db, &[id], at).await?;
    let thumbnails = child_ids::<gallery_menu_category::Entity, C>(
        db,
        gallery_menu_category::Column::MenuCategoryId,
        &[id],
        DeletedFilter::At(at),
    )
    .await?;
    clear_deleted::<gallery_menu_category::Entity, C>(db, &thumbnails, at).await?;
    let subcategories = child_ids::<menu_subcategory::Entity, C>(
        db,
        menu_subcategory::Column::MenuCategoryId,
        &[id],
        DeletedFilter::At(at),
    )
    .await?;
    restore_subcategories(db, &subcategories, at).await
}

async fn restore_subcategories<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
    at: DateTime<Utc>,
) -> Result<(), StoreError> {
    clear_deleted::<menu_subcategory::Entity, C>(db, ids, at).await?;
    let menus = child_ids::<menu::Entity, C>(
        db,
        menu::Column::MenuSubcategoryId,
        ids,
        DeletedFilter::At(at),
    )
    .await?;
    restore_menus(db, &menus, at).await
}

async fn restore_menus<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
    at: DateTime<Utc>,
) -> Result<(), StoreError> {
    clear_deleted::<menu::Entity, C>(db, ids, at).await?;
    let variants = child_ids::<menu_variant::Entity, C>(
        db,
        menu_variant::Column::MenuId,
        ids,
        DeletedFilter::At(at),
    )
    .await?;
    clear_deleted::<menu_variant::Entity, C>(db, &variants, at).await?;
    Ok(())
}

/// Physically removes `ids` of `kind` and everything that depends on them.
pub async fn force_delete<C: ConnectionTrait>(
    db: &C,
    kind: ContentKind,
    ids: &[i32],
) -> Result<u64, StoreError> {
    let removed = match kind {
        ContentKind::MenuCategory => {
            let thumbnails = child_ids::<gallery_menu_category::Entity, C>(
                db,
                gallery_menu_category::Column::MenuCategoryId,
                ids,
                DeletedFilter::Any,
            )
            .await?;
            remove::<gallery_menu_category::Entity, C>(db, &thumbnails).await?;
            let subcategories = child_ids::<menu_subcategory::Entity, C>(
                db,
                menu_subcategory::Column::MenuCategoryId,
                ids,
                DeletedFilter::Any,
            )
            .await?;
            remove_subcategories(db, &subcategories).await?;
            remove::<menu_category::Entity, C>(db, ids).await?
        }
        ContentKind::MenuSubcategory => remove_subcategories(db, ids).await?,
        ContentKind::Menu => remove_menus(db, ids).await?,
        ContentKind::MenuVariant => remove::<menu_variant::Entity, C>(db, ids).await?,
        ContentKind::MenuAddon => {
            if !ids.is_empty() {
                menu_subcategory::Entity::update_many()
                    .col_expr(
                        menu_subcategory::Column::MenuAddonId,
                        Expr::value(Option::<i32>::None),
                    )
                    .filter(menu_subcategory::Column::MenuAddonId.is_in(ids.iter().copied()))
                    .exec(db)
                    .await?;
            }
            remove::<menu_addon::Entity, C>(db, ids).await?
        }
        ContentKind::GalleryCategory => {
            let items = child_ids::<gallery::Entity, C>(
                db,
                gallery::Column::GalleryCategoryId,
                ids,
                DeletedFilter::Any,
            )
            .await?;
            remove::<gallery::Entity, C>(db, &items).await?;
            remove::<gallery_category::Entity, C>(db, ids).await?
        }
        ContentKind::Gallery => remove::<gallery::Entity, C>(db, ids).await?,
        ContentKind::GalleryMenuCategory => {
            remove::<gallery_menu_category::Entity, C>(db, ids).await?
        }
    };
    Ok(removed)
}

async fn remove_subcategories<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<u64, StoreError> {
    let menus = child_ids::<menu::Entity, C>(
        db,
        menu::Column::MenuSubcategoryId,
        ids,
        DeletedFilter::Any,
    )
    .await?;
    remove_menus(db, &menus).await?;
    Ok(remove::<menu_subcategory::Entity, C>(db, ids).await?)
}

async fn remove_menus<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<u64, StoreError> {
    let variants =
        child_ids::<menu_variant::Entity, C>(db, menu_variant::Column::MenuId, ids, DeletedFilter::Any)
            .await?;
    remove::<menu_variant::Entity, C>(db, &variants).await?;
    Ok(remove::<menu::Entity, C>(db, ids).await?)
}

#[cfg(test)]
mod tests {
    use super::ContentKind;

    #[test]
    fn resource_names_round_trip() {
        for kind in ContentKind::ALL {
            assert_eq!(kind.as_str().parse::<ContentKind>(), Ok(kind));
        }
        assert!("orders".parse::<ContentKind>().is_err());
    }

    #[test]
    fn serde_uses_resource_names() {
        let kind: ContentKind = serde_json::from_str("\"gallery-menu-categories\"").unwrap();
        assert_eq!(kind, ContentKind::GalleryMenuCategory);
        assert_eq!(
            serde_json::to_string(&ContentKind::MenuAddon).unwrap(),
            "\"menu-addons\""
        );
    }
}
