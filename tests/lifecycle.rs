mod common;

use catering_site::catalog::{self, MenuFilter};
use catering_site::entities::{
    gallery, gallery_category, gallery_menu_category, menu, menu_addon, menu_category,
    menu_subcategory, menu_variant,
};
use catering_site::store::gallery::{
    self as gallery_store, GalleryCategoryForm, GalleryForm, ThumbnailForm,
};
use catering_site::store::lifecycle::{self, ContentKind};
use catering_site::store::menu::{
    self as menu_store, MenuAddonForm, MenuCategoryForm, MenuForm, MenuSubcategoryForm,
    MenuVariantForm,
};
use catering_site::store::{self, StoreError};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};

struct Tree {
    category: menu_category::Model,
    subcategory: menu_subcategory::Model,
    menu: menu::Model,
    variant: menu_variant::Model,
    thumbnail: gallery_menu_category::Model,
}

async fn menu_tree(db: &DatabaseConnection, name: &str) -> Tree {
    let category = menu_store::create_category(
        db,
        MenuCategoryForm {
            name: name.to_string(),
            slug: None,
        },
    )
    .await
    .unwrap();
    let subcategory = menu_store::create_subcategory(
        db,
        MenuSubcategoryForm {
            menu_category_id: category.id,
            menu_addon_id: None,
            name: format!("{name} Harian"),
            pdf_path: None,
            slug: None,
        },
    )
    .await
    .unwrap();
    let menu = menu_store::create_menu(
        db,
        MenuForm {
            menu_subcategory_id: subcategory.id,
            name: format!("{name} Spesial"),
            description: None,
            price: None,
            image: None,
        },
    )
    .await
    .unwrap();
    let variant = menu_store::create_variant(
        db,
        MenuVariantForm {
            menu_id: menu.id,
            name: Some("Pedas".to_string()),
        },
    )
    .await
    .unwrap();
    let thumbnail = gallery_store::create_thumbnail(
        db,
        ThumbnailForm {
            menu_category_id: category.id,
            name: format!("{name} cover"),
            image: "thumbnails/cover.jpg".to_string(),
        },
    )
    .await
    .unwrap();
    Tree {
        category,
        subcategory,
        menu,
        variant,
        thumbnail,
    }
}

async fn live<E: store::SoftDeletable>(db: &DatabaseConnection, id: i32) -> bool {
    store::find::<E, _>(db, id, false).await.unwrap().is_some()
}

async fn stored<E: store::SoftDeletable>(db: &DatabaseConnection, id: i32) -> bool {
    store::find::<E, _>(db, id, true).await.unwrap().is_some()
}

#[tokio::test]
async fn soft_delete_cascades_down_the_menu_tree() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::database(&dir).await;
    let tree = menu_tree(&db, "Makanan").await;
    let other = menu_tree(&db, "Minuman").await;

    let deleted = lifecycle::soft_delete(&db, ContentKind::MenuCategory, &[tree.category.id])
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    assert!(!live::<menu_category::Entity>(&db, tree.category.id).await);
    assert!(!live::<menu_subcategory::Entity>(&db, tree.subcategory.id).await);
    assert!(!live::<menu::Entity>(&db, tree.menu.id).await);
    assert!(!live::<menu_variant::Entity>(&db, tree.variant.id).await);
    assert!(!live::<gallery_menu_category::Entity>(&db, tree.thumbnail.id).await);
    // Still stored, just hidden.
    assert!(stored::<menu::Entity>(&db, tree.menu.id).await);

    assert!(live::<menu_category::Entity>(&db, other.category.id).await);
    assert!(live::<menu::Entity>(&db, other.menu.id).await);

    let listing = catalog::menu_listing(&db, &MenuFilter::default()).await.unwrap();
    let ids: Vec<i32> = listing.menus.iter().map(|e| e.menu.id).collect();
    assert_eq!(ids, vec![other.menu.id]);
    let home = catalog::homepage(&db).await.unwrap();
    assert_eq!(home.menu_categories.len(), 1);
}

#[tokio::test]
async fn deleted_rows_are_not_found_by_slug() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::database(&dir).await;
    let tree = menu_tree(&db, "Makanan").await;
    menu_tree(&db, "Minuman").await;

    lifecycle::soft_delete(&db, ContentKind::MenuSubcategory, &[tree.subcategory.id])
        .await
        .unwrap();

    let listing = catalog::menu_listing(
        &db,
        &MenuFilter {
            category: None,
            subcategory: Some(tree.subcategory.slug.clone()),
        },
    )
    .await
    .unwrap();
    assert!(listing.selected_subcategory.is_none());
    assert_eq!(listing.menus.len(), 1);
    assert!(live::<menu_category::Entity>(&db, tree.category.id).await);
}

#[tokio::test]
async fn restore_brings_back_what_the_cascade_removed() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::database(&dir).await;
    let tree = menu_tree(&db, "Makanan").await;
    let extra = menu_store::create_variant(
        &db,
        MenuVariantForm {
            menu_id: tree.menu.id,
            name: Some("Original".to_string()),
        },
    )
    .await
    .unwrap();

    // Deleted on its own before the category goes.
    lifecycle::soft_delete(&db, ContentKind::MenuVariant, &[extra.id])
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    lifecycle::soft_delete(&db, ContentKind::MenuCategory, &[tree.category.id])
        .await
        .unwrap();

    assert!(lifecycle::restore(&db, ContentKind::MenuCategory, tree.category.id)
        .await
        .unwrap());

    assert!(live::<menu_category::Entity>(&db, tree.category.id).await);
    assert!(live::<menu_subcategory::Entity>(&db, tree.subcategory.id).await);
    assert!(live::<menu::Entity>(&db, tree.menu.id).await);
    assert!(live::<menu_variant::Entity>(&db, tree.variant.id).await);
    assert!(live::<gallery_menu_category::Entity>(&db, tree.thumbnail.id).await);
    assert!(!live::<menu_variant::Entity>(&db, extra.id).await);

    // Restoring a live row is a no-op.
    assert!(!lifecycle::restore(&db, ContentKind::MenuCategory, tree.category.id)
        .await
        .unwrap());
}

#[tokio::test]
async fn restore_requires_a_live_parent() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::database(&dir).await;
    let tree = menu_tree(&db, "Makanan").await;

    lifecycle::soft_delete(&db, ContentKind::MenuCategory, &[tree.category.id])
        .await
        .unwrap();

    let err = lifecycle::restore(&db, ContentKind::Menu, tree.menu.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingParent(_)));

    let err = lifecycle::restore(&db, ContentKind::Menu, 9_999).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn force_delete_removes_descendants() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::database(&dir).await;
    let tree = menu_tree(&db, "Makanan").await;

    let removed = lifecycle::force_delete(&db, ContentKind::MenuCategory, &[tree.category.id])
        .await
        .unwrap();
    assert_eq!(removed, 1);

    assert!(!stored::<menu_category::Entity>(&db, tree.category.id).await);
    assert!(!stored::<menu_subcategory::Entity>(&db, tree.subcategory.id).await);
    assert!(!stored::<menu::Entity>(&db, tree.menu.id).await);
    assert!(!stored::<menu_variant::Entity>(&db, tree.variant.id).await);
    assert!(!stored::<gallery_menu_category::Entity>(&db, tree.thumbnail.id).await);
}

async fn subcategory_with_addon(
    db: &DatabaseConnection,
) -> (menu_subcategory::Model, menu_addon::Model) {
    let tree = menu_tree(db, "Paket").await;
    let addon = menu_store::create_addon(
        db,
        MenuAddonForm {
            title: "Tambahan".to_string(),
            description: Some("Es teh manis".to_string()),
        },
    )
    .await
    .unwrap();
    let subcategory = menu_store::update_subcategory(
        db,
        tree.subcategory.id,
        MenuSubcategoryForm {
            menu_category_id: tree.category.id,
            menu_addon_id: Some(addon.id),
            name: tree.subcategory.name.clone(),
            pdf_path: None,
            slug: None,
        },
    )
    .await
    .unwrap();
    (subcategory, addon)
}

#[tokio::test]
async fn soft_deleted_addon_disappears_from_the_listing() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::database(&dir).await;
    let (subcategory, addon) = subcategory_with_addon(&db).await;
    let filter = MenuFilter {
        category: None,
        subcategory: Some(subcategory.slug.clone()),
    };

    let listing = catalog::menu_listing(&db, &filter).await.unwrap();
    assert_eq!(listing.addon.map(|a| a.id), Some(addon.id));

    lifecycle::soft_delete(&db, ContentKind::MenuAddon, &[addon.id])
        .await
        .unwrap();

    let listing = catalog::menu_listing(&db, &filter).await.unwrap();
    assert!(listing.addon.is_none());
    assert_eq!(listing.selected_subcategory.map(|s| s.id), Some(subcategory.id));
    let row = store::find::<menu_subcategory::Entity, _>(&db, subcategory.id, false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.menu_addon_id, Some(addon.id));
}

#[tokio::test]
async fn force_deleted_addon_is_detached() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::database(&dir).await;
    let (subcategory, addon) = subcategory_with_addon(&db).await;

    lifecycle::force_delete(&db, ContentKind::MenuAddon, &[addon.id])
        .await
        .unwrap();

    let row = store::find::<menu_subcategory::Entity, _>(&db, subcategory.id, false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.menu_addon_id, None);
    assert!(!stored::<menu_addon::Entity>(&db, addon.id).await);
}

#[tokio::test]
async fn gallery_category_cascade_and_restore() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::database(&dir).await;
    let category = gallery_store::create_category(
        &db,
        GalleryCategoryForm {
            name: "Pernikahan".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    let item = gallery_store::create_gallery(
        &db,
        GalleryForm {
            gallery_category_id: category.id,
            name: "Dekorasi".to_string(),
            description: None,
            image: Some("gallery/dekorasi.jpg".to_string()),
        },
    )
    .await
    .unwrap();

    lifecycle::soft_delete(&db, ContentKind::GalleryCategory, &[category.id])
        .await
        .unwrap();
    assert!(!live::<gallery::Entity>(&db, item.id).await);

    let err = lifecycle::restore(&db, ContentKind::Gallery, item.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingParent(_)));

    assert!(lifecycle::restore(&db, ContentKind::GalleryCategory, category.id)
        .await
        .unwrap());
    assert!(live::<gallery_category::Entity>(&db, category.id).await);
    assert!(live::<gallery::Entity>(&db, item.id).await);
}

#[tokio::test]
async fn lifecycle_over_http() {
    let app = common::spawn_app().await;
    let category = app
        .create("/admin/menu-categories", json!({ "name": "Makanan" }))
        .await;
    let id = category["id"].as_i64().unwrap();
    let subcategory = app
        .create(
            "/admin/menu-subcategories",
            json!({ "menu_category_id": id, "name": "Nasi" }),
        )
        .await;
    let sub_id = subcategory["id"].as_i64().unwrap();

    let response = app.delete(&format!("/admin/menu-categories/{id}")).await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["deleted"], 1);

    let response = app
        .client
        .get(app.url(&format!("/admin/menu-subcategories/{sub_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    let hidden: Value = app
        .get_json(&format!("/admin/menu-subcategories/{sub_id}?include_deleted=true"))
        .await;
    assert!(!hidden["deleted_at"].is_null());

    let listed: Vec<Value> = app.get_json("/admin/menu-categories").await;
    assert!(listed.is_empty());
    let listed: Vec<Value> = app.get_json("/admin/menu-categories?include_deleted=true").await;
    assert_eq!(listed.len(), 1);

    let response = app
        .post_json(&format!("/admin/menu-categories/{id}/restore"), json!({}))
        .await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["restored"], true);
    let restored: Value = app
        .get_json(&format!("/admin/menu-subcategories/{sub_id}"))
        .await;
    assert!(restored["deleted_at"].is_null());

    let response = app.delete(&format!("/admin/menu-categories/{id}/force")).await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let listed: Vec<Value> = app.get_json("/admin/menu-subcategories?include_deleted=true").await;
    assert!(listed.is_empty());

    let response = app.delete(&format!("/admin/menu-categories/{id}")).await;
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_delete_over_http() {
    let app = common::spawn_app().await;
    let mut ids = Vec::new();
    for name in ["Snack", "Kue", "Buah"] {
        let addon = app
            .create("/admin/menu-addons", json!({ "title": name }))
            .await;
        ids.push(addon["id"].as_i64().unwrap());
    }

    let response = app
        .post_json("/admin/menu-addons/bulk-delete", json!({ "ids": [ids[0], ids[1]] }))
        .await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["deleted"], 2);
    let live: Vec<Value> = app.get_json("/admin/menu-addons").await;
    assert_eq!(live.len(), 1);

    let response = app
        .post_json(
            "/admin/menu-addons/bulk-delete",
            json!({ "ids": ids, "force": true }),
        )
        .await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["deleted"], 3);
    let all: Vec<Value> = app.get_json("/admin/menu-addons?include_deleted=true").await;
    assert!(all.is_empty());

    let response = app
        .post_json("/admin/menu-addons/bulk-delete", json!({ "ids": [] }))
        .await;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}
