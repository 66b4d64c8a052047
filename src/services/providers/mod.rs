/// Catalog data provider abstraction
///
/// The page assemblers and the query cache only talk to a [`CatalogProvider`], so the
/// upstream metadata service can be swapped or mocked. Every implementation returns
/// normalized records: list and details calls carry the media kind they were asked for.
use crate::{
    error::AppResult,
    models::{Credits, MediaKind, RecommendationPage, SearchPage, Title},
};

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Trait for catalog metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Popular titles of one kind, each stamped with `kind`
    async fn list_popular(&self, kind: MediaKind) -> AppResult<Vec<Title>>;

    /// Top rated titles of one kind, each stamped with `kind`
    async fn list_top_rated(&self, kind: MediaKind) -> AppResult<Vec<Title>>;

    /// Titles trending today, mixed kinds
    async fn trending(&self) -> AppResult<Vec<Title>>;

    /// Multi-search by free text. A blank query yields an empty page without any I/O.
    async fn search_multi(&self, query: &str, page: u32) -> AppResult<SearchPage>;

    /// Full record for one title, stamped with the requested `kind`
    async fn details(&self, id: u64, kind: MediaKind) -> AppResult<Title>;

    async fn credits(&self, id: u64, kind: MediaKind) -> AppResult<Credits>;

    async fn recommendations(&self, id: u64, kind: MediaKind) -> AppResult<RecommendationPage>;

    /// Key of the first YouTube trailer, if any
    async fn trailer_key(&self, id: u64, kind: MediaKind) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
