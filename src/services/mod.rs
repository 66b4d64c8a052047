pub mod catalog;
pub mod formatters;
pub mod images;
pub mod providers;

pub use catalog::CatalogQueries;
pub use images::{image_url, ImageSize};
