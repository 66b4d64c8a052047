use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    models::{Credits, MediaKind, RecommendationPage, SearchPage, Title},
    services::providers::CatalogProvider,
    store::{CacheKey, QueryCache, QueryObserver, QueryState},
};

/// Only the first page of search results is ever requested
pub const SEARCH_PAGE: u32 = 1;

/// Query cache facade over a [`CatalogProvider`]
///
/// Owns one cache per result type and decides the key and the enabled condition of
/// every catalog call: searches run only for a non-blank query, credits and
/// recommendations only once the caller says the title itself has resolved.
/// Every call is a remount: cached data comes back at once and the key is
/// refreshed in the background.
pub struct CatalogQueries {
    provider: Arc<dyn CatalogProvider>,
    lists: QueryCache<Vec<Title>>,
    titles: QueryCache<Title>,
    credits: QueryCache<Credits>,
    recommendations: QueryCache<RecommendationPage>,
    searches: QueryCache<SearchPage>,
    trailers: QueryCache<Option<String>>,
}

impl CatalogQueries {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        tracing::info!(provider = provider.name(), "Catalog queries initialized");

        Self {
            provider,
            lists: QueryCache::new("lists"),
            titles: QueryCache::new("titles"),
            credits: QueryCache::new("credits"),
            recommendations: QueryCache::new("recommendations"),
            searches: QueryCache::new("searches"),
            trailers: QueryCache::new("trailers"),
        }
    }

    pub async fn trending(&self) -> QueryState<Vec<Title>> {
        let provider = Arc::clone(&self.provider);
        self.lists
            .fetch_revalidate(CacheKey::Trending, true, move || async move {
                provider.trending().await
            })
            .await
    }

    pub async fn popular(&self, kind: MediaKind) -> QueryState<Vec<Title>> {
        let provider = Arc::clone(&self.provider);
        self.lists
            .fetch_revalidate(CacheKey::Popular(kind), true, move || async move {
                provider.list_popular(kind).await
            })
            .await
    }

    pub async fn top_rated(&self, kind: MediaKind) -> QueryState<Vec<Title>> {
        let provider = Arc::clone(&self.provider);
        self.lists
            .fetch_revalidate(CacheKey::TopRated(kind), true, move || async move {
                provider.list_top_rated(kind).await
            })
            .await
    }

    pub async fn details(&self, id: u64, kind: MediaKind) -> QueryState<Title> {
        let provider = Arc::clone(&self.provider);
        self.titles
            .fetch_revalidate(CacheKey::Details { id, kind }, true, move || async move {
                provider.details(id, kind).await
            })
            .await
    }

    /// Credits of a title; nothing is requested while `enabled` is false
    pub async fn credits(&self, id: u64, kind: MediaKind, enabled: bool) -> QueryState<Credits> {
        let provider = Arc::clone(&self.provider);
        self.credits
            .fetch_revalidate(CacheKey::Credits { id, kind }, enabled, move || async move {
                provider.credits(id, kind).await
            })
            .await
    }

    /// Recommendations for a title; nothing is requested while `enabled` is false
    pub async fn recommendations(
        &self,
        id: u64,
        kind: MediaKind,
        enabled: bool,
    ) -> QueryState<RecommendationPage> {
        let provider = Arc::clone(&self.provider);
        self.recommendations
            .fetch_revalidate(
                CacheKey::Recommendations { id, kind },
                enabled,
                move || async move { provider.recommendations(id, kind).await },
            )
            .await
    }

    pub async fn trailer_key(&self, id: u64, kind: MediaKind) -> QueryState<Option<String>> {
        let provider = Arc::clone(&self.provider);
        self.trailers
            .fetch_revalidate(CacheKey::Trailer { id, kind }, true, move || async move {
                provider.trailer_key(id, kind).await
            })
            .await
    }

    /// First page of a multi-search; a blank query stays idle
    pub async fn search(&self, query: &str) -> QueryState<SearchPage> {
        let (key, enabled) = search_key(query);
        let provider = Arc::clone(&self.provider);
        let query = query.to_string();
        self.searches
            .fetch_revalidate(key, enabled, move || async move {
                provider.search_multi(&query, SEARCH_PAGE).await
            })
            .await
    }

    /// Details of the first trending title, looked up with its own media kind
    ///
    /// Idle when there is nothing trending; carries the trending error if that failed.
    pub async fn featured(&self) -> QueryState<Title> {
        let trending = self.trending().await;
        if let Some(err) = trending.error {
            return QueryState {
                data: None,
                is_loading: false,
                error: Some(err),
            };
        }

        match trending.data.as_ref().and_then(|titles| titles.first()) {
            Some(first) => self.details(first.id, first.media_type).await,
            None => QueryState::idle(),
        }
    }

    /// A fresh slot for a search consumer such as the search overlay
    pub fn search_observer(&self) -> QueryObserver<SearchPage> {
        QueryObserver::new(self.searches.clone())
    }

    /// Points `observer` at `query`, enabled only for a non-blank query
    pub fn observe_search(
        &self,
        observer: &QueryObserver<SearchPage>,
        query: &str,
    ) -> Option<JoinHandle<()>> {
        let (key, enabled) = search_key(query);
        let provider = Arc::clone(&self.provider);
        let query = query.to_string();
        observer.observe(key, enabled, move || async move {
            provider.search_multi(&query, SEARCH_PAGE).await
        })
    }
}

fn search_key(query: &str) -> (CacheKey, bool) {
    let key = CacheKey::Search {
        query: query.to_string(),
        page: SEARCH_PAGE,
    };
    (key, !query.trim().is_empty())
}
