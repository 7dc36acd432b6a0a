//! Gallery categories, gallery items and menu-category thumbnails.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, IntoActiveModel, Set};
use serde::Deserialize;
use validator::Validate;

use super::{find, require_live, StoreError};
use crate::assets::validate_asset_path;
use crate::entities::{gallery, gallery_category, gallery_menu_category, menu_category};
use crate::slug::{derive_slug, validate_sluggable};

/// The slug is not part of the form: it always follows the name.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct GalleryCategoryForm {
    #[validate(length(min = 1, max = 255), custom(function = "validate_sluggable"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct GalleryForm {
    pub gallery_category_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_asset_path"))]
    pub image: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ThumbnailForm {
    pub menu_category_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1), custom(function = "validate_asset_path"))]
    pub image: String,
}

// Recomputed on every save, without a uniqueness token.
fn gallery_category_slug(name: &str) -> String {
    derive_slug(name, None)
}

pub async fn create_category<C: ConnectionTrait>(
    db: &C,
    form: GalleryCategoryForm,
) -> Result<gallery_category::Model, StoreError> {
    let now = Utc::now();
    let model = gallery_category::ActiveModel {
        slug: Set(gallery_category_slug(&form.name)),
        name: Set(form.name),
        description: Set(form.description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

pub async fn update_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
    form: GalleryCategoryForm,
) -> Result<gallery_category::Model, StoreError> {
    let current = find::<gallery_category::Entity, C>(db, id, false)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Gallery category {id}")))?;
    let mut active = current.into_active_model();
    active.slug = Set(gallery_category_slug(&form.name));
    active.name = Set(form.name);
    active.description = Set(form.description);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

pub async fn create_gallery<C: ConnectionTrait>(
    db: &C,
    form: GalleryForm,
) -> Result<gallery::Model, StoreError> {
    require_live::<gallery_category::Entity, C>(db, form.gallery_category_id, "Gallery category")
        .await?;
    let now = Utc::now();
    let model = gallery::ActiveModel {
        gallery_category_id: Set(form.gallery_category_id),
        name: Set(form.name),
        description: Set(form.description),
        image: Set(form.image),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

pub async fn update_gallery<C: ConnectionTrait>(
    db: &C,
    id: i32,
    form: GalleryForm,
) -> Result<gallery::Model, StoreError> {
    let current = find::<gallery::Entity, C>(db, id, false)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Gallery {id}")))?;
    require_live::<gallery_category::Entity, C>(db, form.gallery_category_id, "Gallery category")
        .await?;
    let mut active = current.into_active_model();
    active.gallery_category_id = Set(form.gallery_category_id);
    active.name = Set(form.name);
    active.description = Set(form.description);
    active.image = Set(form.image);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

pub async fn create_thumbnail<C: ConnectionTrait>(
    db: &C,
    form: ThumbnailForm,
) -> Result<gallery_menu_category::Model, StoreError> {
    require_live::<menu_category::Entity, C>(db, form.menu_category_id, "Menu category").await?;
    let now = Utc::now();
    let model = gallery_menu_category::ActiveModel {
        menu_category_id: Set(form.menu_category_id),
        name: Set(form.name),
        image: Set(form.image),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

pub async fn update_thumbnail<C: ConnectionTrait>(
    db: &C,
    id: i32,
    form: ThumbnailForm,
) -> Result<gallery_menu_category::Model, StoreError> {
    let current = find::<gallery_menu_category::Entity, C>(db, id, false)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Menu category image {id}")))?;
    require_live::<menu_category::Entity, C>(db, form.menu_category_id, "Menu category").await?;
    let mut active = current.into_active_model();
    active.menu_category_id = Set(form.menu_category_id);
    active.name = Set(form.name);
    active.image = Set(form.image);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}
