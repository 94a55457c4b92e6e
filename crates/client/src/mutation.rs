//! Single-flight mutation runner.
//!
//! A page owns one [`Mutation`] per action (approve, reject, submit...). While
//! it runs, `is_pending()` is true and the trigger is disabled; a second run
//! is refused with [`ClientError::Busy`]. Success invalidates the query keys
//! the action affects.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::cache::{QueryCache, QueryKey};
use crate::error::ClientError;

#[derive(Debug, Clone, Default)]
pub struct Mutation {
    pending: Arc<AtomicBool>,
}

/// Clears the pending flag however the run ends.
struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Mutation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Run `action`, then invalidate `invalidates` if it succeeded.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Busy` if this mutation is already running,
    /// otherwise the action's own error.
    pub async fn run<T, Fut>(
        &self,
        cache: &QueryCache,
        invalidates: &[QueryKey],
        action: Fut,
    ) -> Result<T, ClientError>
    where
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if self
            .pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ClientError::Busy);
        }
        let _guard = PendingGuard(&self.pending);

        let value = action.await?;
        for key in invalidates {
            cache.invalidate(key).await;
        }
        Ok(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn test_second_run_while_pending_is_busy() {
        let cache = QueryCache::default();
        let mutation = Mutation::new();
        let (release, wait) = oneshot::channel::<()>();

        let running = {
            let mutation = mutation.clone();
            let cache = cache.clone();
            tokio::spawn(async move {
                mutation
                    .run(&cache, &[], async move {
                        wait.await.ok();
                        Ok::<_, ClientError>("first")
                    })
                    .await
            })
        };

        while !mutation.is_pending() {
            tokio::task::yield_now().await;
        }

        let second = mutation.run(&cache, &[], async { Ok("second") }).await;
        assert!(matches!(second, Err(ClientError::Busy)));

        release.send(()).unwrap();
        assert_eq!(running.await.unwrap().unwrap(), "first");
        assert!(!mutation.is_pending());
    }

    #[tokio::test]
    async fn test_success_invalidates_keys() {
        let cache = QueryCache::default();
        cache.set(QueryKey::from(["admin-approvals", "pending"]), 1_u8).await;
        cache.set(QueryKey::new("cities"), 2_u8).await;

        Mutation::new()
            .run(
                &cache,
                &[QueryKey::new("admin-approvals")],
                async { Ok::<_, ClientError>(()) },
            )
            .await
            .unwrap();

        assert_eq!(
            cache.get::<u8>(&QueryKey::from(["admin-approvals", "pending"])).await,
            None
        );
        assert_eq!(cache.get::<u8>(&QueryKey::new("cities")).await, Some(2));
    }

    #[tokio::test]
    async fn test_failure_keeps_cache_and_clears_pending() {
        let cache = QueryCache::default();
        cache.set(QueryKey::new("favorites"), 1_u8).await;
        let mutation = Mutation::new();

        let result = mutation
            .run(&cache, &[QueryKey::new("favorites")], async {
                Err::<(), _>(ClientError::NotAuthenticated)
            })
            .await;

        assert!(matches!(result, Err(ClientError::NotAuthenticated)));
        assert!(!mutation.is_pending());
        assert_eq!(cache.get::<u8>(&QueryKey::new("favorites")).await, Some(1));
    }
}
