//! Store Provider
//!
//! Normalizes a direct store instance and a lazy factory into one provider
//! function that is invoked on every access.

use std::fmt;
use std::sync::Arc;

use super::KeyValueStore;

type ResolveFn = dyn Fn() -> Arc<dyn KeyValueStore> + Send + Sync;

/// Resolves the store handle for each cache operation.
#[derive(Clone)]
pub struct StoreProvider {
    resolve: Arc<ResolveFn>,
}

impl StoreProvider {
    /// Wraps an already constructed store.
    pub fn instance(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            resolve: Arc::new(move || Arc::clone(&store)),
        }
    }

    /// Wraps a factory evaluated fresh on every access.
    pub fn lazy<F>(factory: F) -> Self
    where
        F: Fn() -> Arc<dyn KeyValueStore> + Send + Sync + 'static,
    {
        Self {
            resolve: Arc::new(factory),
        }
    }

    pub fn resolve(&self) -> Arc<dyn KeyValueStore> {
        (self.resolve)()
    }
}

impl<S> From<Arc<S>> for StoreProvider
where
    S: KeyValueStore + 'static,
{
    fn from(store: Arc<S>) -> Self {
        StoreProvider::instance(store)
    }
}

impl fmt::Debug for StoreProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreProvider").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_instance_resolves_same_store() {
        let store = Arc::new(MemoryStore::new());
        let provider = StoreProvider::from(store.clone());

        provider.resolve().set("k", b"v".to_vec()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_lazy_invoked_on_every_access() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let provider = StoreProvider::lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        provider.resolve();
        provider.resolve();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
