pub mod debug;
pub mod gallery;
pub mod home;
pub mod menu;
pub mod storage;

use axum::Router;

use debug::debug_router;
use gallery::gallery_router;
use home::home_router;
use menu::menu_router;
use storage::storage_router;

pub fn public_router() -> Router {
    Router::new()
        .merge(home_router())
        .merge(menu_router())
        .merge(gallery_router())
        .merge(storage_router())
        .merge(debug_router())
}
