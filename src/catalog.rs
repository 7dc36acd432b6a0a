//! Read side of the public site: menu navigation, gallery filtering and the
//! homepage overview.
//!
//! Filters are slugs taken from the query string. A slug that matches nothing
//! is treated as if it had not been given at all.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::entities::{
    gallery, gallery_category, gallery_menu_category, menu, menu_addon, menu_category,
    menu_subcategory, menu_variant,
};
use crate::store::{find, scoped};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MenuFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GalleryFilter {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MenuEntry {
    pub menu: menu::Model,
    pub variants: Vec<menu_variant::Model>,
}

#[derive(Debug, Serialize)]
pub struct MenuListing {
    pub categories: Vec<menu_category::Model>,
    pub selected_category: Option<menu_category::Model>,
    pub selected_subcategory: Option<menu_subcategory::Model>,
    pub subcategories: Vec<menu_subcategory::Model>,
    pub menus: Vec<MenuEntry>,
    pub addon: Option<menu_addon::Model>,
    pub pdf_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GalleryListing {
    pub categories: Vec<gallery_category::Model>,
    pub selected_category: Option<gallery_category::Model>,
    pub galleries: Vec<gallery::Model>,
}

#[derive(Debug, Serialize)]
pub struct MenuCategoryCard {
    pub category: menu_category::Model,
    pub thumbnail: Option<gallery_menu_category::Model>,
}

#[derive(Debug, Serialize)]
pub struct GalleryCategoryCard {
    pub category: gallery_category::Model,
    pub cover: Option<gallery::Model>,
}

#[derive(Debug, Serialize)]
pub struct Homepage {
    pub menu_categories: Vec<MenuCategoryCard>,
    pub gallery_categories: Vec<GalleryCategoryCard>,
}

fn non_empty(slug: &Option<String>) -> Option<&str> {
    slug.as_deref().filter(|slug| !slug.is_empty())
}

pub async fn menu_listing<C: ConnectionTrait>(
    db: &C,
    filter: &MenuFilter,
) -> Result<MenuListing, DbErr> {
    let categories = scoped(menu_category::Entity::find(), false)
        .order_by_asc(menu_category::Column::Id)
        .all(db)
        .await?;

    let selected_category = match non_empty(&filter.category) {
        Some(slug) => categories.iter().find(|c| c.slug == slug).cloned(),
        None => None,
    };

    let selected_subcategory = match non_empty(&filter.subcategory) {
        Some(slug) => {
            scoped(menu_subcategory::Entity::find(), false)
                .filter(menu_subcategory::Column::Slug.eq(slug))
                .order_by_asc(menu_subcategory::Column::Id)
                .one(db)
                .await?
        }
        None => None,
    };

    let mut subcategories = scoped(menu_subcategory::Entity::find(), false);
    if let Some(category) = &selected_category {
        subcategories =
            subcategories.filter(menu_subcategory::Column::MenuCategoryId.eq(category.id));
    }
    let subcategories = subcategories
        .order_by_asc(menu_subcategory::Column::Id)
        .all(db)
        .await?;

    let mut menus = scoped(menu::Entity::find(), false);
    if let Some(subcategory) = &selected_subcategory {
        menus = menus.filter(menu::Column::MenuSubcategoryId.eq(subcategory.id));
    } else if selected_category.is_some() {
        // `subcategories` is already narrowed to the selected category.
        let ids: Vec<i32> = subcategories.iter().map(|s| s.id).collect();
        menus = menus.filter(menu::Column::MenuSubcategoryId.is_in(ids));
    }
    let menus = menus.order_by_asc(menu::Column::Id).all(db).await?;
    let menus = attach_variants(db, menus).await?;

    let (addon, pdf_path) = match &selected_subcategory {
        Some(subcategory) => {
            let fresh = find::<menu_subcategory::Entity, C>(db, subcategory.id, false).await?;
            let pdf_path = fresh.as_ref().and_then(|s| s.pdf_path.clone());
            let addon = match fresh.and_then(|s| s.menu_addon_id) {
                Some(addon_id) => find::<menu_addon::Entity, C>(db, addon_id, false).await?,
                None => None,
            };
            (addon, pdf_path)
        }
        None => (None, None),
    };

    Ok(MenuListing {
        categories,
        selected_category,
        selected_subcategory,
        subcategories,
        menus,
        addon,
        pdf_path,
    })
}

async fn attach_variants<C: ConnectionTrait>(
    db: &C,
    menus: Vec<menu::Model>,
) -> Result<Vec<MenuEntry>, DbErr> {
    let ids: Vec<i32> = menus.iter().map(|m| m.id).collect();
    let mut by_menu: HashMap<i32, Vec<menu_variant::Model>> = HashMap::new();
    if !ids.is_empty() {
        let variants = scoped(menu_variant::Entity::find(), false)
            .filter(menu_variant::Column::MenuId.is_in(ids))
            .order_by_asc(menu_variant::Column::Id)
            .all(db)
            .await?;
        for variant in variants {
            by_menu.entry(variant.menu_id).or_default().push(variant);
        }
    }

    Ok(menus
        .into_iter()
        .map(|menu| MenuEntry {
            variants: by_menu.remove(&menu.id).unwrap_or_default(),
            menu,
        })
        .collect())
}

pub async fn gallery_listing<C: ConnectionTrait>(
    db: &C,
    filter: &GalleryFilter,
) -> Result<GalleryListing, DbErr> {
    let categories = scoped(gallery_category::Entity::find(), false)
        .order_by_asc(gallery_category::Column::Id)
        .all(db)
        .await?;

    // Slugs may repeat here; the oldest category wins.
    let selected_category = match non_empty(&filter.category) {
        Some(slug) => categories.iter().find(|c| c.slug == slug).cloned(),
        None => None,
    };

    let mut galleries = scoped(gallery::Entity::find(), false);
    if let Some(category) = &selected_category {
        galleries = galleries.filter(gallery::Column::GalleryCategoryId.eq(category.id));
    }
    let galleries = galleries.order_by_asc(gallery::Column::Id).all(db).await?;

    Ok(GalleryListing {
        categories,
        selected_category,
        galleries,
    })
}

pub async fn homepage<C: ConnectionTrait>(db: &C) -> Result<Homepage, DbErr> {
    let menu_categories = scoped(menu_category::Entity::find(), false)
        .order_by_asc(menu_category::Column::Id)
        .all(db)
        .await?;
    let thumbnails = scoped(gallery_menu_category::Entity::find(), false)
        .order_by_desc(gallery_menu_category::Column::CreatedAt)
        .order_by_desc(gallery_menu_category::Column::Id)
        .all(db)
        .await?;
    let mut latest: HashMap<i32, gallery_menu_category::Model> = HashMap::new();
    for thumbnail in thumbnails {
        latest.entry(thumbnail.menu_category_id).or_insert(thumbnail);
    }

    let gallery_categories = scoped(gallery_category::Entity::find(), false)
        .order_by_asc(gallery_category::Column::Id)
        .all(db)
        .await?;
    let items = scoped(gallery::Entity::find(), false)
        .order_by_asc(gallery::Column::Id)
        .all(db)
        .await?;
    let mut first: HashMap<i32, gallery::Model> = HashMap::new();
    for item in items {
        first.entry(item.gallery_category_id).or_insert(item);
    }

    Ok(Homepage {
        menu_categories: menu_categories
            .into_iter()
            .map(|category| MenuCategoryCard {
                thumbnail: latest.remove(&category.id),
                category,
            })
            .collect(),
        gallery_categories: gallery_categories
            .into_iter()
            .map(|category| GalleryCategoryCard {
                cover: first.remove(&category.id),
                category,
            })
            .collect(),
    })
}

/// Category of a menu item, two hops away through its subcategory.
///
/// `None` when either hop is missing or soft-deleted.
pub async fn category_of_menu<C: ConnectionTrait>(
    db: &C,
    menu: &menu::Model,
) -> Result<Option<menu_category::Model>, DbErr> {
    let Some(subcategory) =
        find::<menu_subcategory::Entity, C>(db, menu.menu_subcategory_id, false).await?
    else {
        return Ok(None);
    };
    find::<menu_category::Entity, C>(db, subcategory.menu_category_id, false).await
}
