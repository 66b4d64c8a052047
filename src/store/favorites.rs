use std::sync::Arc;

use tokio::sync::broadcast;

use crate::models::Title;
use crate::store::local::LocalStorage;

/// Storage slot holding the JSON-encoded favorites list
pub const FAVORITES_KEY: &str = "tmdb_favorites";

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Mutation notification sent to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesChange {
    Added { id: u64 },
    Removed { id: u64 },
}

/// The user's saved titles, unique by id, in insertion order
///
/// Every effective mutation writes the whole collection back to the storage slot
/// before returning. Titles are stored as independent copies.
pub struct FavoritesStore {
    storage: Arc<dyn LocalStorage>,
    entries: Vec<Title>,
    changes: broadcast::Sender<FavoritesChange>,
}

impl FavoritesStore {
    /// Rehydrates the store from `storage`
    ///
    /// A missing, unreadable or malformed slot yields an empty collection.
    pub fn load(storage: Arc<dyn LocalStorage>) -> Self {
        let entries = match storage.get_item(FAVORITES_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Title>>(&json) {
                Ok(titles) => dedupe(titles),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored favorites are malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored favorites, starting empty");
                Vec::new()
            }
        };

        tracing::info!(count = entries.len(), "Favorites loaded");

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            storage,
            entries,
            changes,
        }
    }

    /// Saves `title`. Returns false, keeping the first copy, if its id is already saved.
    pub fn add(&mut self, title: Title) -> bool {
        if self.is_favorite(title.id) {
            return false;
        }

        let id = title.id;
        self.entries.push(title);
        self.persist();
        self.notify(FavoritesChange::Added { id });
        true
    }

    /// Removes the title with `id`. Returns false if it was not saved.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|title| title.id != id);
        if self.entries.len() == before {
            return false;
        }

        self.persist();
        self.notify(FavoritesChange::Removed { id });
        true
    }

    pub fn is_favorite(&self, id: u64) -> bool {
        self.entries.iter().any(|title| title.id == id)
    }

    pub fn list(&self) -> &[Title] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesChange> {
        self.changes.subscribe()
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Favorites serialization error");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(FAVORITES_KEY, &json) {
            tracing::error!(error = %e, count = self.entries.len(), "Failed to persist favorites");
        }
    }

    fn notify(&self, change: FavoritesChange) {
        // No subscribers is fine.
        let _ = self.changes.send(change);
    }
}

fn dedupe(titles: Vec<Title>) -> Vec<Title> {
    let mut entries: Vec<Title> = Vec::with_capacity(titles.len());
    for title in titles {
        if !entries.iter().any(|existing| existing.id == title.id) {
            entries.push(title);
        }
    }
    entries
}
