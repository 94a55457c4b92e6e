//! Shared query cache.
//!
//! Query results are cached under ordered keys such as `["businesses", "3"]`.
//! Invalidating a prefix drops every entry under it and broadcasts an
//! [`Invalidation`] so views holding derived data know to re-fetch. Failed
//! loads are never cached.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::ClientError;

/// Ordered list of key segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Single-segment key.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self(vec![root.into()])
    }

    /// Append a segment.
    #[must_use]
    pub fn with(mut self, segment: impl fmt::Display) -> Self {
        self.0.push(segment.to_string());
        self
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether `prefix` matches the leading segments of this key.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl<const N: usize> From<[&str; N]> for QueryKey {
    fn from(segments: [&str; N]) -> Self {
        Self(segments.iter().map(ToString::to_string).collect())
    }
}

/// Sent to subscribers after a prefix was invalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidation {
    pub prefix: QueryKey,
}

impl Invalidation {
    /// Whether a view keyed by `key` is affected.
    #[must_use]
    pub fn affects(&self, key: &QueryKey) -> bool {
        key.starts_with(&self.prefix)
    }
}

type CachedValue = Arc<dyn Any + Send + Sync>;

/// Typed query cache shared by every page.
///
/// Cheap to clone; clones share entries and the invalidation channel.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<QueryCacheInner>,
}

struct QueryCacheInner {
    entries: Cache<QueryKey, CachedValue>,
    events: broadcast::Sender<Invalidation>,
    /// Bumped by every invalidation. A load that straddles one is not cached.
    generation: AtomicU64,
}

impl QueryCache {
    /// Maximum number of cached queries.
    pub const MAX_CAPACITY: u64 = 1000;

    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(Self::MAX_CAPACITY)
            .time_to_live(ttl)
            .build();
        let (events, _) = broadcast::channel(64);

        Self {
            inner: Arc::new(QueryCacheInner {
                entries,
                events,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Cached value for `key`, or the result of `loader`, which is cached
    /// only on success and only if no invalidation ran while it loaded.
    ///
    /// # Errors
    ///
    /// Returns the loader's error.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, loader: F) -> Result<T, ClientError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if let Some(value) = self.get::<T>(&key).await {
            debug!("Cache hit for query: {key}");
            return Ok(value);
        }

        let generation = self.inner.generation.load(Ordering::Acquire);
        let value = loader().await?;
        if self.inner.generation.load(Ordering::Acquire) == generation {
            self.set(key, value.clone()).await;
        } else {
            debug!("Discarding stale load for query: {key}");
        }
        Ok(value)
    }

    /// Cached value for `key`. A value stored under a different type is a
    /// miss.
    pub async fn get<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.inner
            .entries
            .get(key)
            .await
            .and_then(|value| value.downcast_ref::<T>().cloned())
    }

    /// Seed or overwrite an entry.
    pub async fn set<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.inner.entries.insert(key, Arc::new(value)).await;
    }

    /// Drop every entry whose key starts with `prefix` and notify
    /// subscribers.
    pub async fn invalidate(&self, prefix: &QueryKey) {
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        let stale: Vec<Arc<QueryKey>> = self
            .inner
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key)
            .collect();

        for key in &stale {
            self.inner.entries.invalidate(key.as_ref()).await;
        }

        debug!(prefix = %prefix, removed = stale.len(), "Invalidated queries");
        // No subscribers is fine.
        let _ = self.inner.events.send(Invalidation {
            prefix: prefix.clone(),
        });
    }

    /// Drop everything (e.g. on sign-out).
    pub async fn invalidate_all(&self) {
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.entries.invalidate_all();
        self.inner.entries.run_pending_tasks().await;
    }

    /// Receive future invalidations.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.inner.events.subscribe()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(300))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use reqwest::StatusCode;

    use super::*;

    fn counting_loader(
        calls: &Arc<AtomicUsize>,
        value: Vec<&'static str>,
    ) -> impl FnOnce() -> std::future::Ready<Result<Vec<&'static str>, ClientError>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(value))
        }
    }

    #[test]
    fn test_key_prefix() {
        let key = QueryKey::new("businesses").with(3);
        assert!(key.starts_with(&QueryKey::new("businesses")));
        assert!(key.starts_with(&key));
        assert!(!key.starts_with(&QueryKey::from(["businesses", "4"])));
        assert!(!QueryKey::new("business").starts_with(&QueryKey::new("businesses")));
        assert_eq!(key.to_string(), "[businesses, 3]");
    }

    #[tokio::test]
    async fn test_fetch_caches_success() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .fetch(QueryKey::new("cities"), counting_loader(&calls, vec!["Austin"]))
            .await
            .unwrap();
        let second = cache
            .fetch(QueryKey::new("cities"), counting_loader(&calls, vec!["Other"]))
            .await
            .unwrap();

        assert_eq!(first, vec!["Austin"]);
        assert_eq!(second, vec!["Austin"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = QueryCache::default();
        let key = QueryKey::new("adminStats");

        let err = cache
            .fetch(key.clone(), || async {
                Err::<u64, _>(ClientError::Api {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: None,
                })
            })
            .await;
        assert!(err.is_err());

        let ok = cache.fetch(key, || async { Ok(7_u64) }).await.unwrap();
        assert_eq!(ok, 7);
    }

    #[tokio::test]
    async fn test_type_mismatch_is_a_miss() {
        let cache = QueryCache::default();
        cache.set(QueryKey::new("x"), 5_u32).await;
        assert_eq!(cache.get::<String>(&QueryKey::new("x")).await, None);
        assert_eq!(cache.get::<u32>(&QueryKey::new("x")).await, Some(5));
    }

    #[tokio::test]
    async fn test_invalidate_prefix_and_notify() {
        let cache = QueryCache::default();
        let mut events = cache.subscribe();

        cache.set(QueryKey::from(["admin-approvals", "pending"]), 1_u8).await;
        cache.set(QueryKey::from(["admin-approvals", "approved"]), 2_u8).await;
        cache.set(QueryKey::new("cities"), 3_u8).await;

        cache.invalidate(&QueryKey::new("admin-approvals")).await;

        assert_eq!(
            cache.get::<u8>(&QueryKey::from(["admin-approvals", "pending"])).await,
            None
        );
        assert_eq!(
            cache.get::<u8>(&QueryKey::from(["admin-approvals", "approved"])).await,
            None
        );
        assert_eq!(cache.get::<u8>(&QueryKey::new("cities")).await, Some(3));

        let event = events.recv().await.unwrap();
        assert_eq!(event.prefix, QueryKey::new("admin-approvals"));
        assert!(event.affects(&QueryKey::from(["admin-approvals", "rejected"])));
        assert!(!event.affects(&QueryKey::new("cities")));
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = QueryCache::default();
        cache.set(QueryKey::new("favorites"), 1_u8).await;
        cache.invalidate_all().await;
        assert_eq!(cache.get::<u8>(&QueryKey::new("favorites")).await, None);
    }

    #[tokio::test]
    async fn test_load_racing_invalidation_is_not_cached() {
        let cache = QueryCache::default();
        let key = QueryKey::from(["admin-approvals", "pending"]);

        let value = cache
            .fetch(key.clone(), || async {
                cache.invalidate(&QueryKey::new("admin-approvals")).await;
                Ok(4_u8)
            })
            .await
            .unwrap();

        assert_eq!(value, 4);
        assert_eq!(cache.get::<u8>(&key).await, None);

        let fresh = cache.fetch(key.clone(), || async { Ok(5_u8) }).await.unwrap();
        assert_eq!(fresh, 5);
        assert_eq!(cache.get::<u8>(&key).await, Some(5));
    }
}
