//! Menu categories, subcategories, menu items, variants and add-ons.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, IntoActiveModel, Set};
use serde::Deserialize;
use validator::Validate;

use super::{find, require_live, StoreError};
use crate::assets::validate_asset_path;
use crate::entities::{menu, menu_addon, menu_category, menu_subcategory, menu_variant};
use crate::slug::{blank_as_none, unique_slug, validate_slug, validate_sluggable};

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct MenuCategoryForm {
    #[validate(length(min = 1, max = 255), custom(function = "validate_sluggable"))]
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct MenuSubcategoryForm {
    pub menu_category_id: i32,
    pub menu_addon_id: Option<i32>,
    #[validate(length(min = 1, max = 255), custom(function = "validate_sluggable"))]
    pub name: String,
    #[validate(custom(function = "validate_asset_path"))]
    pub pdf_path: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct MenuForm {
    pub menu_subcategory_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[validate(custom(function = "validate_asset_path"))]
    pub image: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct MenuVariantForm {
    pub menu_id: i32,
    #[validate(length(max = 255))]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct MenuAddonForm {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
}

/// Pre-save slug rule for menu categories and subcategories.
///
/// A slug is only generated when none is stored or supplied; renaming never
/// touches an existing slug.
pub fn resolve_menu_slug(current: Option<&str>, supplied: Option<String>, name: &str) -> String {
    match (supplied.filter(|s| !s.is_empty()), current.filter(|s| !s.is_empty())) {
        (Some(slug), _) => slug,
        (None, Some(slug)) => slug.to_owned(),
        (None, None) => unique_slug(name),
    }
}

fn negative_price(price: Option<Decimal>) -> Result<(), StoreError> {
    match price {
        Some(price) if price.is_sign_negative() => {
            Err(StoreError::Invalid("price must not be negative".into()))
        }
        _ => Ok(()),
    }
}

pub async fn create_category<C: ConnectionTrait>(
    db: &C,
    form: MenuCategoryForm,
) -> Result<menu_category::Model, StoreError> {
    let now = Utc::now();
    let slug = resolve_menu_slug(None, form.slug, &form.name);
    let model = menu_category::ActiveModel {
        name: Set(form.name),
        slug: Set(slug),
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
    form: MenuCategoryForm,
) -> Result<menu_category::Model, StoreError> {
    let current = find::<menu_category::Entity, C>(db, id, false)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Menu category {id}")))?;
    let slug = resolve_menu_slug(Some(&current.slug), form.slug, &form.name);
    let mut active = current.into_active_model();
    active.name = Set(form.name);
    active.slug = Set(slug);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

pub async fn create_subcategory<C: ConnectionTrait>(
    db: &C,
    form: MenuSubcategoryForm,
) -> Result<menu_subcategory::Model, StoreError> {
    check_subcategory_parents(db, &form).await?;
    let now = Utc::now();
    let slug = resolve_menu_slug(None, form.slug, &form.name);
    let model = menu_subcategory::ActiveModel {
        menu_category_id: Set(form.menu_category_id),
        menu_addon_id: Set(form.menu_addon_id),
        name: Set(form.name),
        pdf_path: Set(form.pdf_path),
        slug: Set(slug),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

pub async fn update_subcategory<C: ConnectionTrait>(
    db: &C,
    id: i32,
    form: MenuSubcategoryForm,
) -> Result<menu_subcategory::Model, StoreError> {
    let current = find::<menu_subcategory::Entity, C>(db, id, false)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Menu subcategory {id}")))?;
    check_subcategory_parents(db, &form).await?;
    let slug = resolve_menu_slug(Some(&current.slug), form.slug, &form.name);
    let mut active = current.into_active_model();
    active.menu_category_id = Set(form.menu_category_id);
    active.menu_addon_id = Set(form.menu_addon_id);
    active.name = Set(form.name);
    active.pdf_path = Set(form.pdf_path);
    active.slug = Set(slug);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

async fn check_subcategory_parents<C: ConnectionTrait>(
    db: &C,
    form: &MenuSubcategoryForm,
) -> Result<(), StoreError> {
    require_live::<menu_category::Entity, C>(db, form.menu_category_id, "Menu category").await?;
    if let Some(addon_id) = form.menu_addon_id {
        require_live::<menu_addon::Entity, C>(db, addon_id, "Menu addon").await?;
    }
    Ok(())
}

pub async fn create_menu<C: ConnectionTrait>(
    db: &C,
    form: MenuForm,
) -> Result<menu::Model, StoreError> {
    negative_price(form.price)?;
    require_live::<menu_subcategory::Entity, C>(db, form.menu_subcategory_id, "Menu subcategory")
        .await?;
    let now = Utc::now();
    let model = menu::ActiveModel {
        menu_subcategory_id: Set(form.menu_subcategory_id),
        name: Set(form.name),
        description: Set(form.description),
        price: Set(form.price),
        image: Set(form.image),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

pub async fn update_menu<C: ConnectionTrait>(
    db: &C,
    id: i32,
    form: MenuForm,
) -> Result<menu::Model, StoreError> {
    negative_price(form.price)?;
    let current = find::<menu::Entity, C>(db, id, false)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Menu {id}")))?;
    require_live::<menu_subcategory::Entity, C>(db, form.menu_subcategory_id, "Menu subcategory")
        .await?;
    let mut active = current.into_active_model();
    active.menu_subcategory_id = Set(form.menu_subcategory_id);
    active.name = Set(form.name);
    active.description = Set(form.description);
    active.price = Set(form.price);
    active.image = Set(form.image);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

pub async fn create_variant<C: ConnectionTrait>(
    db: &C,
    form: MenuVariantForm,
) -> Result<menu_variant::Model, StoreError> {
    require_live::<menu::Entity, C>(db, form.menu_id, "Menu").await?;
    let now = Utc::now();
    let model = menu_variant::ActiveModel {
        menu_id: Set(form.menu_id),
        name: Set(form.name),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

pub async fn update_variant<C: ConnectionTrait>(
    db: &C,
    id: i32,
    form: MenuVariantForm,
) -> Result<menu_variant::Model, StoreError> {
    let current = find::<menu_variant::Entity, C>(db, id, false)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Menu variant {id}")))?;
    require_live::<menu::Entity, C>(db, form.menu_id, "Menu").await?;
    let mut active = current.into_active_model();
    active.menu_id = Set(form.menu_id);
    active.name = Set(form.name);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

pub async fn create_addon<C: ConnectionTrait>(
    db: &C,
    form: MenuAddonForm,
) -> Result<menu_addon::Model, StoreError> {
    let now = Utc::now();
    let model = menu_addon::ActiveModel {
        title: Set(form.title),
        description: Set(form.description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

pub async fn update_addon<C: ConnectionTrait>(
    db: &C,
    id: i32,
    form: MenuAddonForm,
) -> Result<menu_addon::Model, StoreError> {
    let current = find::<menu_addon::Entity, C>(db, id, false)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Menu addon {id}")))?;
    let mut active = current.into_active_model();
    active.title = Set(form.title);
    active.description = Set(form.description);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}
