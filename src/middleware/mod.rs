pub mod error_pages;
pub mod logging;
pub mod visits;
