use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::error::{AppError, AppResult};
use crate::models::MediaKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Trending,
    Popular(MediaKind),
    TopRated(MediaKind),
    Details { id: u64, kind: MediaKind },
    Credits { id: u64, kind: MediaKind },
    Recommendations { id: u64, kind: MediaKind },
    Trailer { id: u64, kind: MediaKind },
    Search { query: String, page: u32 },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Trending => write!(f, "trending"),
            CacheKey::Popular(kind) => write!(f, "popular:{}", kind),
            CacheKey::TopRated(kind) => write!(f, "top_rated:{}", kind),
            CacheKey::Details { id, kind } => write!(f, "details:{}:{}", kind, id),
            CacheKey::Credits { id, kind } => write!(f, "credits:{}:{}", kind, id),
            CacheKey::Recommendations { id, kind } => write!(f, "recommendations:{}:{}", kind, id),
            CacheKey::Trailer { id, kind } => write!(f, "trailer:{}:{}", kind, id),
            CacheKey::Search { query, page } => write!(f, "search:{}:{}", page, query),
        }
    }
}

/// What a consumer of a cache key sees
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<Arc<AppError>>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> QueryState<T> {
    /// No request issued: the query is disabled or not yet mounted
    pub fn idle() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Collapses the state: the retained error if any, else the data (absent while idle)
    pub fn into_result(self) -> AppResult<Option<T>> {
        match self.error {
            Some(err) => Err(AppError::from(err)),
            None => Ok(self.data),
        }
    }
}

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, Arc<AppError>>>>;

struct InFlight<T> {
    request_id: u64,
    future: SharedFetch<T>,
}

struct Entry<T> {
    data: Option<T>,
    error: Option<Arc<AppError>>,
    in_flight: Option<InFlight<T>>,
    /// Highest request id whose result was applied (or that an invalidation superseded)
    applied: u64,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            in_flight: None,
            applied: 0,
        }
    }
}

impl<T: Clone> Entry<T> {
    fn state(&self) -> QueryState<T> {
        QueryState {
            data: self.data.clone(),
            is_loading: self.in_flight.is_some(),
            error: self.error.clone(),
        }
    }
}

struct Inner<T> {
    entries: HashMap<CacheKey, Entry<T>>,
    next_request_id: u64,
}

/// Keyed async cache over catalog calls
///
/// Identical keys requested concurrently share one in-flight request. Results are
/// kept for the lifetime of the cache and never evicted. For a given key, a
/// response is only applied if no newer request for that key has already been
/// applied, so out-of-order completions cannot roll the entry back.
pub struct QueryCache<T> {
    name: &'static str,
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: Arc::clone(&self.inner),
        }
    }
}

enum Begin<T> {
    Cached(T),
    Pending(u64, SharedFetch<T>),
}

impl<T> QueryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                next_request_id: 0,
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // Bookkeeping never panics while holding the lock; recover if a caller did.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current state of `key` without issuing any request
    pub fn snapshot(&self, key: &CacheKey) -> QueryState<T> {
        self.lock()
            .entries
            .get(key)
            .map(Entry::state)
            .unwrap_or_default()
    }

    /// Returns cached data for `key`, or joins/starts a request for it
    ///
    /// When `enabled` is false nothing is requested and the idle state is returned.
    /// A key whose last request failed is requested again.
    pub async fn fetch<F, Fut>(&self, key: CacheKey, enabled: bool, fetcher: F) -> QueryState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        if !enabled {
            tracing::trace!(cache = self.name, key = %key, "Query disabled");
            return QueryState::idle();
        }

        match self.begin(&key, false, fetcher) {
            Begin::Cached(data) => {
                tracing::trace!(cache = self.name, key = %key, "Cache hit");
                QueryState {
                    data: Some(data),
                    is_loading: false,
                    error: None,
                }
            }
            Begin::Pending(request_id, future) => {
                let result = future.await;
                self.settle(&key, request_id, result)
            }
        }
    }

    /// Stale-then-revalidate read for a remounted consumer
    ///
    /// With successful cached data, returns it at once (`is_loading` set) and refreshes
    /// `key` in a background task. Otherwise behaves like [`fetch`](Self::fetch).
    pub async fn fetch_revalidate<F, Fut>(
        &self,
        key: CacheKey,
        enabled: bool,
        fetcher: F,
    ) -> QueryState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        if !enabled {
            return QueryState::idle();
        }

        let cached = self.snapshot(&key);
        let stale = match cached.data {
            Some(data) if cached.error.is_none() => data,
            _ => return self.fetch(key, true, fetcher).await,
        };

        match self.begin(&key, true, fetcher) {
            Begin::Cached(data) => QueryState {
                data: Some(data),
                is_loading: false,
                error: None,
            },
            Begin::Pending(request_id, future) => {
                tracing::trace!(cache = self.name, key = %key, "Serving stale data, revalidating");
                let cache = self.clone();
                tokio::spawn(async move {
                    let result = future.await;
                    cache.settle(&key, request_id, result);
                });
                QueryState {
                    data: Some(stale),
                    is_loading: true,
                    error: None,
                }
            }
        }
    }

    /// Always requests `key` again (joining a request already in flight), keeping the
    /// previous data visible until the new result arrives
    pub async fn revalidate<F, Fut>(&self, key: CacheKey, enabled: bool, fetcher: F) -> QueryState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        if !enabled {
            return QueryState::idle();
        }

        match self.begin(&key, true, fetcher) {
            Begin::Cached(data) => QueryState {
                data: Some(data),
                is_loading: false,
                error: None,
            },
            Begin::Pending(request_id, future) => {
                let result = future.await;
                self.settle(&key, request_id, result)
            }
        }
    }

    /// Forgets the data for `key`; responses to requests issued earlier are ignored
    pub fn invalidate(&self, key: &CacheKey) {
        let mut inner = self.lock();
        let superseded = inner.next_request_id;
        if let Some(entry) = inner.entries.get_mut(key) {
            entry.data = None;
            entry.error = None;
            entry.in_flight = None;
            entry.applied = superseded;
            tracing::debug!(cache = self.name, key = %key, "Cache entry invalidated");
        }
    }

    fn begin<F, Fut>(&self, key: &CacheKey, force: bool, fetcher: F) -> Begin<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let mut inner = self.lock();
        inner.next_request_id += 1;
        let request_id = inner.next_request_id;
        let entry = inner.entries.entry(key.clone()).or_default();

        if !force && entry.error.is_none() {
            if let Some(data) = &entry.data {
                return Begin::Cached(data.clone());
            }
        }

        if let Some(in_flight) = &entry.in_flight {
            tracing::trace!(cache = self.name, key = %key, "Joining in-flight request");
            return Begin::Pending(in_flight.request_id, in_flight.future.clone());
        }

        tracing::debug!(cache = self.name, key = %key, request_id, "Issuing request");
        let future = fetcher().map(|result| result.map_err(Arc::new)).boxed().shared();
        entry.in_flight = Some(InFlight {
            request_id,
            future: future.clone(),
        });
        Begin::Pending(request_id, future)
    }

    fn settle(
        &self,
        key: &CacheKey,
        request_id: u64,
        result: Result<T, Arc<AppError>>,
    ) -> QueryState<T> {
        let mut inner = self.lock();
        let entry = inner.entries.entry(key.clone()).or_default();

        if entry
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.request_id == request_id)
        {
            entry.in_flight = None;
        }

        if request_id > entry.applied {
            entry.applied = request_id;
            match &result {
                Ok(data) => {
                    entry.data = Some(data.clone());
                    entry.error = None;
                }
                Err(err) => {
                    tracing::warn!(cache = self.name, key = %key, error = %err, "Query failed");
                    entry.error = Some(Arc::clone(err));
                }
            }
            return entry.state();
        }

        if request_id < entry.applied {
            tracing::debug!(
                cache = self.name,
                key = %key,
                request_id,
                "Discarding superseded response"
            );
        }

        // Superseded or already applied by another consumer of the same request: the
        // caller still sees the outcome of the request it awaited.
        match result {
            Ok(data) => QueryState {
                data: Some(data),
                is_loading: false,
                error: None,
            },
            Err(err) => QueryState {
                data: None,
                is_loading: false,
                error: Some(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    #[test]
    fn test_cache_key_display() {
        assert_eq!(CacheKey::Trending.to_string(), "trending");
        assert_eq!(CacheKey::Popular(MediaKind::Tv).to_string(), "popular:tv");
        assert_eq!(
            CacheKey::Details {
                id: 1399,
                kind: MediaKind::Tv
            }
            .to_string(),
            "details:tv:1399"
        );
        assert_eq!(
            CacheKey::Search {
                query: "bat".to_string(),
                page: 1
            }
            .to_string(),
            "search:1:bat"
        );
    }

    #[tokio::test]
    async fn test_disabled_query_never_calls_fetcher() {
        let cache: QueryCache<Vec<u32>> = QueryCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let state = cache
            .fetch(CacheKey::Trending, false, move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(vec![1])
            })
            .await;

        assert!(state.data.is_none());
        assert!(!state.is_loading);
        assert!(!state.is_error());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let cache: QueryCache<u32> = QueryCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let counter = Arc::clone(&calls);
            let state = cache
                .fetch(CacheKey::Trending, true, move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await;
            assert_eq!(state.data, Some(7));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_identical_keys_share_one_request() {
        let cache: QueryCache<u32> = QueryCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));
        let (release, gate) = oneshot::channel::<()>();

        let first = {
            let cache = cache.clone();
            let counter = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .fetch(CacheKey::Popular(MediaKind::Movie), true, move || async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        let _ = gate.await;
                        Ok(42)
                    })
                    .await
            })
        };

        // Let the first request register as in flight.
        tokio::task::yield_now().await;
        while !cache.snapshot(&CacheKey::Popular(MediaKind::Movie)).is_loading {
            tokio::task::yield_now().await;
        }

        let second = {
            let cache = cache.clone();
            let counter = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .fetch(CacheKey::Popular(MediaKind::Movie), true, move || async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok(0)
                    })
                    .await
            })
        };

        tokio::task::yield_now().await;
        release.send(()).unwrap();

        assert_eq!(first.await.unwrap().data, Some(42));
        assert_eq!(second.await.unwrap().data, Some(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_is_retained_then_refetched() {
        let cache: QueryCache<u32> = QueryCache::new("test");

        let state = cache
            .fetch(CacheKey::Trending, true, || async {
                Err(AppError::ExternalApi("status 500".to_string()))
            })
            .await;
        assert!(state.is_error());
        assert!(cache.snapshot(&CacheKey::Trending).is_error());

        let state = cache.fetch(CacheKey::Trending, true, || async { Ok(3) }).await;
        assert_eq!(state.data, Some(3));
        assert!(!state.is_error());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache: QueryCache<String> = QueryCache::new("test");
        let movie = CacheKey::Details {
            id: 1,
            kind: MediaKind::Movie,
        };
        let series = CacheKey::Details {
            id: 1,
            kind: MediaKind::Tv,
        };

        cache
            .fetch(movie.clone(), true, || async { Ok("movie".to_string()) })
            .await;

        let snapshot = cache.snapshot(&series);
        assert!(snapshot.data.is_none());
        assert!(!snapshot.is_loading);
        assert_eq!(cache.snapshot(&movie).data.as_deref(), Some("movie"));
    }

    #[tokio::test]
    async fn test_revalidate_keeps_stale_data_until_new_result() {
        let cache: QueryCache<u32> = QueryCache::new("test");
        cache.fetch(CacheKey::Trending, true, || async { Ok(1) }).await;

        let (release, gate) = oneshot::channel::<()>();
        let task = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .revalidate(CacheKey::Trending, true, move || async move {
                        let _ = gate.await;
                        Ok(2)
                    })
                    .await
            })
        };

        while !cache.snapshot(&CacheKey::Trending).is_loading {
            tokio::task::yield_now().await;
        }
        let stale = cache.snapshot(&CacheKey::Trending);
        assert_eq!(stale.data, Some(1));

        release.send(()).unwrap();
        assert_eq!(task.await.unwrap().data, Some(2));
        assert_eq!(cache.snapshot(&CacheKey::Trending).data, Some(2));
    }

    #[tokio::test]
    async fn test_fetch_revalidate_serves_stale_then_refreshes() {
        let cache: QueryCache<u32> = QueryCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        let fetch = |cache: QueryCache<u32>, calls: Arc<AtomicUsize>| async move {
            cache
                .fetch_revalidate(CacheKey::Trending, true, move || async move {
                    Ok(calls.fetch_add(1, Ordering::SeqCst) as u32 + 1)
                })
                .await
        };

        let first = fetch(cache.clone(), Arc::clone(&calls)).await;
        assert_eq!(first.data, Some(1));
        assert!(!first.is_loading);

        let second = fetch(cache.clone(), Arc::clone(&calls)).await;
        assert_eq!(second.data, Some(1));
        assert!(second.is_loading);

        while cache.snapshot(&CacheKey::Trending).is_loading {
            tokio::task::yield_now().await;
        }
        assert_eq!(cache.snapshot(&CacheKey::Trending).data, Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_revalidate_disabled_is_idle() {
        let cache: QueryCache<u32> = QueryCache::new("test");
        cache.fetch(CacheKey::Trending, true, || async { Ok(1) }).await;

        let state = cache
            .fetch_revalidate(CacheKey::Trending, false, || async { Ok(2) })
            .await;
        assert!(state.data.is_none());
        assert!(!state.is_loading);
        assert!(!cache.snapshot(&CacheKey::Trending).is_loading);
    }

    #[tokio::test]
    async fn test_response_issued_before_invalidation_is_not_applied() {
        let cache: QueryCache<u32> = QueryCache::new("test");
        let (release, gate) = oneshot::channel::<()>();

        let task = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .fetch(CacheKey::Trending, true, move || async move {
                        let _ = gate.await;
                        Ok(1)
                    })
                    .await
            })
        };

        while !cache.snapshot(&CacheKey::Trending).is_loading {
            tokio::task::yield_now().await;
        }
        cache.invalidate(&CacheKey::Trending);
        release.send(()).unwrap();
        task.await.unwrap();

        assert!(cache.snapshot(&CacheKey::Trending).data.is_none());
    }
}
