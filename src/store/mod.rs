pub mod cache;
pub mod favorites;
pub mod local;
pub mod observer;

pub use cache::{CacheKey, QueryCache, QueryState};
pub use favorites::{FavoritesChange, FavoritesStore, FAVORITES_KEY};
pub use local::{JsonFileStorage, LocalStorage, MemoryStorage};
pub use observer::QueryObserver;
