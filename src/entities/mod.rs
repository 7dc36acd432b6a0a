pub mod gallery;
pub mod gallery_category;
pub mod gallery_menu_category;
pub mod menu;
pub mod menu_addon;
pub mod menu_category;
pub mod menu_subcategory;
pub mod menu_variant;
pub mod visit;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    Schema, Set, TransactionTrait,
};
use tracing::info;

pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    // Parents before children.
    let mut statements = vec![
        schema.create_table_from_entity(menu_category::Entity),
        schema.create_table_from_entity(menu_addon::Entity),
        schema.create_table_from_entity(menu_subcategory::Entity),
        schema.create_table_from_entity(menu::Entity),
        schema.create_table_from_entity(menu_variant::Entity),
        schema.create_table_from_entity(gallery_menu_category::Entity),
        schema.create_table_from_entity(gallery_category::Entity),
        schema.create_table_from_entity(gallery::Entity),
        schema.create_table_from_entity(visit::Entity),
    ];

    for statement in statements.iter_mut() {
        statement.if_not_exists();
        db.execute(backend.build(&*statement)).await?;
    }

    let mut indexes = Vec::new();
    indexes.extend(schema.create_index_from_entity(menu_subcategory::Entity));
    indexes.extend(schema.create_index_from_entity(menu::Entity));
    indexes.extend(schema.create_index_from_entity(menu_variant::Entity));
    indexes.extend(schema.create_index_from_entity(gallery_menu_category::Entity));
    indexes.extend(schema.create_index_from_entity(gallery_category::Entity));
    indexes.extend(schema.create_index_from_entity(gallery::Entity));

    for index in indexes.iter_mut() {
        index.if_not_exists();
        db.execute(backend.build(&*index)).await?;
    }

    Ok(())
}

/// Inserts the sample catalog when no menu category exists yet.
///
/// Returns `false` when the database already had content.
pub async fn seed_demo(db: &DatabaseConnection) -> Result<bool, DbErr> {
    if menu_category::Entity::find().count(db).await? > 0 {
        return Ok(false);
    }

    let now = Utc::now();
    let txn = db.begin().await?;

    let category = menu_category::ActiveModel {
        name: Set("Makanan".to_owned()),
        slug: Set("makanan-ab12".to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut subcategories = Vec::new();
    for (name, slug) in [("Nasi Goreng", "nasi-goreng-cd34"), ("Mie Ayam", "mie-ayam-ef56")] {
        let subcategory = menu_subcategory::ActiveModel {
            menu_category_id: Set(category.id),
            name: Set(name.to_owned()),
            slug: Set(slug.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        subcategories.push(subcategory);
    }

    let menu = menu::ActiveModel {
        menu_subcategory_id: Set(subcategories[0].id),
        name: Set("Nasi Goreng Spesial".to_owned()),
        price: Set(Some(Decimal::new(2_500_000, 2))),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for name in ["Pedas", "Original"] {
        menu_variant::ActiveModel {
            menu_id: Set(menu.id),
            name: Set(Some(name.to_owned())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    info!(category = %category.slug, "Seeded demo catalog");
    Ok(true)
}
