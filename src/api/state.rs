use std::sync::Arc;

use tokio::sync::RwLock;

use crate::services::{providers::CatalogProvider, CatalogQueries};
use crate::store::FavoritesStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogQueries>,
    pub favorites: Arc<RwLock<FavoritesStore>>,
}

impl AppState {
    /// Creates the state from a catalog provider and a rehydrated favorites store
    pub fn new(provider: Arc<dyn CatalogProvider>, favorites: FavoritesStore) -> Self {
        Self {
            catalog: Arc::new(CatalogQueries::new(provider)),
            favorites: Arc::new(RwLock::new(favorites)),
        }
    }
}
