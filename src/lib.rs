//! Movie and TV discovery data layer over The Movie Database.
//!
//! - [`services::providers`]: TMDB client behind the [`CatalogProvider`](services::providers::CatalogProvider) trait
//! - [`store`]: keyed query cache, query observers, favorites store
//! - [`ui`]: carousel scroll controller, search overlay, routes
//! - [`api`]: page assemblers served as JSON

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod ui;
