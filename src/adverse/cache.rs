use std::num::NonZeroUsize;

use lru::LruCache;
use tokio::sync::Mutex;

/// Bounded memo of adverse-event report counts, keyed by cleaned ingredient name.
///
/// Shared by every in-flight analysis; the least recently used entry is evicted
/// once `capacity` is reached.
pub struct LookupCache {
    store: Mutex<LruCache<String, u64>>,
}

impl LookupCache {
    const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(512) {
        Some(n) => n,
        None => unreachable!(),
    };

    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(Self::FALLBACK_CAPACITY);
        LookupCache {
            store: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Cached count for `key`, marking it most recently used.
    pub async fn get(&self, key: &str) -> Option<u64> {
        self.store.lock().await.get(key).copied()
    }

    pub async fn insert(&self, key: String, count: u64) {
        self.store.lock().await.put(key, count);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_and_insert() {
        let cache = LookupCache::new(4);
        assert_eq!(cache.get("citric acid").await, None);
        cache.insert("citric acid".into(), 12).await;
        assert_eq!(cache.get("citric acid").await, Some(12));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_least_recently_used_is_evicted() {
        let cache = LookupCache::new(2);
        cache.insert("a".into(), 1).await;
        cache.insert("b".into(), 2).await;
        // touch "a" so "b" becomes the eviction candidate
        assert_eq!(cache.get("a").await, Some(1));
        cache.insert("c".into(), 3).await;

        assert_eq!(cache.get("b").await, None);
        assert_eq!(cache.get("a").await, Some(1));
        assert_eq!(cache.get("c").await, Some(3));
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_zero_capacity_uses_fallback() {
        let cache = LookupCache::new(0);
        for i in 0..3 {
            cache.insert(format!("k{}", i), i).await;
        }
        assert_eq!(cache.len().await, 3);
    }
}
