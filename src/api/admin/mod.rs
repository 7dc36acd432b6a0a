pub mod gallery;
pub mod gallery_category;
pub mod gallery_menu_category;
pub mod lifecycle;
pub mod menu;
pub mod menu_addon;
pub mod menu_category;
pub mod menu_subcategory;
pub mod menu_variant;
pub mod visit;

use axum::Router;
use serde::Deserialize;

/// Admin CRUD surface. Authentication is expected in front of this router.
pub fn admin_api_router() -> Router {
    Router::new()
        .merge(menu_category::admin_menu_category_router())
        .merge(menu_subcategory::admin_menu_subcategory_router())
        .merge(menu::admin_menu_router())
        .merge(menu_variant::admin_menu_variant_router())
        .merge(menu_addon::admin_menu_addon_router())
        .merge(gallery_category::admin_gallery_category_router())
        .merge(gallery::admin_gallery_router())
        .merge(gallery_menu_category::admin_gallery_menu_category_router())
        .merge(visit::admin_visit_router())
}

#[derive(Debug, Default, Deserialize)]
pub struct ReadQuery {
    #[serde(default)]
    pub include_deleted: bool,
}
