use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::AppResult;
use crate::store::cache::{CacheKey, QueryCache, QueryState};

/// A mounted consumer of one logical query slot
///
/// Each call to [`observe`](Self::observe) points the slot at a key. The slot shows
/// the new key's cached data (never the previous key's) while the key is revalidated,
/// and a response is only published if the slot has not moved on in the meantime.
/// Listeners subscribe through a `watch` channel.
pub struct QueryObserver<T> {
    cache: QueryCache<T>,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<QueryState<T>>>,
}

impl<T> QueryObserver<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(cache: QueryCache<T>) -> Self {
        let (state, _) = watch::channel(QueryState::idle());
        Self {
            cache,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.state.subscribe()
    }

    /// Latest published state
    pub fn state(&self) -> QueryState<T> {
        self.state.borrow().clone()
    }

    /// Points the slot at `key` and revalidates it in the background
    ///
    /// Returns the handle of the background request, or `None` when the query is
    /// disabled (the slot then shows the idle state).
    pub fn observe<F, Fut>(&self, key: CacheKey, enabled: bool, fetcher: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        // The generation moves under the watch lock so a publisher that checked it
        // can never race a newer observe or detach.
        let mut generation = 0;
        let cached = enabled.then(|| self.cache.snapshot(&key));
        self.state.send_modify(|current| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *current = match cached {
                Some(cached) => QueryState {
                    data: cached.data,
                    is_loading: true,
                    error: None,
                },
                None => QueryState::idle(),
            };
        });

        if !enabled {
            return None;
        }

        let cache = self.cache.clone();
        let current = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);

        Some(tokio::spawn(async move {
            let result = cache.revalidate(key.clone(), true, fetcher).await;

            let published = state.send_if_modified(|slot| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *slot = result;
                true
            });

            if !published {
                tracing::debug!(
                    cache = cache.name(),
                    key = %key,
                    "Discarding response for a superseded query"
                );
            }
        }))
    }

    /// Abandons whatever the slot is waiting for and returns it to idle
    pub fn detach(&self) {
        self.state.send_modify(|current| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *current = QueryState::idle();
        });
    }
}

impl<T> Drop for QueryObserver<T> {
    fn drop(&mut self) {
        self.state.send_if_modified(|_| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            false
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use tokio::sync::oneshot;

    fn search_key(query: &str) -> CacheKey {
        CacheKey::Search {
            query: query.to_string(),
            page: 1,
        }
    }

    #[tokio::test]
    async fn test_late_response_for_previous_key_is_discarded() {
        let cache: QueryCache<Vec<String>> = QueryCache::new("search");
        let observer = QueryObserver::new(cache.clone());

        let (release_bat, bat_gate) = oneshot::channel::<()>();
        let (release_batman, batman_gate) = oneshot::channel::<()>();

        let bat = observer
            .observe(search_key("bat"), true, move || async move {
                let _ = bat_gate.await;
                Ok(vec!["Bat*21".to_string()])
            })
            .unwrap();
        let batman = observer
            .observe(search_key("batman"), true, move || async move {
                let _ = batman_gate.await;
                Ok(vec!["Batman Begins".to_string()])
            })
            .unwrap();

        release_batman.send(()).unwrap();
        batman.await.unwrap();
        release_bat.send(()).unwrap();
        bat.await.unwrap();

        let state = observer.state();
        assert_eq!(state.data, Some(vec!["Batman Begins".to_string()]));
        assert!(!state.is_loading);

        // The cache itself still learned both keys.
        assert_eq!(
            cache.snapshot(&search_key("bat")).data,
            Some(vec!["Bat*21".to_string()])
        );
    }

    #[tokio::test]
    async fn test_new_key_never_shows_previous_key_data() {
        let cache: QueryCache<u32> = QueryCache::new("details");
        let observer = QueryObserver::new(cache.clone());

        observer
            .observe(search_key("first"), true, || async { Ok(1) })
            .unwrap()
            .await
            .unwrap();
        assert_eq!(observer.state().data, Some(1));

        let (release, gate) = oneshot::channel::<()>();
        let handle = observer
            .observe(search_key("second"), true, move || async move {
                let _ = gate.await;
                Ok(2)
            })
            .unwrap();

        let loading = observer.state();
        assert!(loading.is_loading);
        assert_eq!(loading.data, None);

        release.send(()).unwrap();
        handle.await.unwrap();
        assert_eq!(observer.state().data, Some(2));
    }

    #[tokio::test]
    async fn test_disabled_key_is_idle() {
        let cache: QueryCache<u32> = QueryCache::new("search");
        let observer = QueryObserver::new(cache);

        assert!(observer
            .observe(search_key(""), false, || async { Ok(1) })
            .is_none());
        let state = observer.state();
        assert!(state.data.is_none());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_detach_abandons_in_flight_result() {
        let cache: QueryCache<u32> = QueryCache::new("details");
        let observer = QueryObserver::new(cache);
        let mut updates = observer.subscribe();

        let (release, gate) = oneshot::channel::<()>();
        let handle = observer
            .observe(search_key("x"), true, move || async move {
                let _ = gate.await;
                Ok(9)
            })
            .unwrap();

        observer.detach();
        release.send(()).unwrap();
        handle.await.unwrap();

        assert!(observer.state().data.is_none());
        assert!(updates.has_changed().unwrap());
        assert!(updates.borrow_and_update().data.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_detach_racing_a_response_never_publishes_it() {
        let cache: QueryCache<u32> = QueryCache::new("details");
        let observer = Arc::new(QueryObserver::new(cache));

        for round in 0..500u32 {
            let handle = observer
                .observe(search_key("race"), true, move || async move { Ok(round) })
                .unwrap();

            let detaching = {
                let observer = Arc::clone(&observer);
                tokio::spawn(async move { observer.detach() })
            };

            detaching.await.unwrap();
            handle.await.unwrap();

            let state = observer.state();
            assert!(state.data.is_none(), "round {} published after detach", round);
            assert!(!state.is_loading);
        }
    }

    #[tokio::test]
    async fn test_errors_are_published() {
        let cache: QueryCache<u32> = QueryCache::new("details");
        let observer = QueryObserver::new(cache);

        observer
            .observe(search_key("x"), true, || async {
                Err(AppError::ExternalApi("status 404".to_string()))
            })
            .unwrap()
            .await
            .unwrap();

        let state = observer.state();
        assert!(state.is_error());
        assert!(!state.is_loading);
    }
}
