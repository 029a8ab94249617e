use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::storage::{Storage, StorageError};
use crate::models::{Catalog, ShowRecord};

/// How long a cached result set stays valid
const CACHE_DURATION_HOURS: i64 = 24;

/// Fingerprint for one logical request
///
/// `Display` renders the stored key. Catalog names and queries are
/// lower-cased and trimmed so identical logical requests collapse to one
/// slot regardless of casing or surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Trending(Catalog),
    Search(Catalog, String),
    SearchAll(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Trending(catalog) => {
                write!(f, "trending:{}", catalog.name().to_lowercase())
            }
            CacheKey::Search(catalog, query) => write!(
                f,
                "search:{}:{}",
                catalog.name().to_lowercase(),
                query.trim().to_lowercase()
            ),
            CacheKey::SearchAll(query) => {
                write!(f, "search-all:{}", query.trim().to_lowercase())
            }
        }
    }
}

/// One stored result set with its write timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub records: Vec<ShowRecord>,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(records: Vec<ShowRecord>) -> Self {
        Self {
            records,
            stored_at: Utc::now(),
        }
    }

    /// An entry is valid iff it was stored less than 24 hours before `now`
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.stored_at < Duration::hours(CACHE_DURATION_HOURS)
    }
}

/// Time-boxed result cache over a pluggable storage backend
///
/// Expiry is lazy: stale entries are detected and removed on access, not by
/// a background sweep. Storage failures are swallowed and reported as a miss
/// or a dropped write; the cache must never turn into a correctness
/// dependency for callers.
#[derive(Clone)]
pub struct Cache {
    storage: Arc<dyn Storage>,
}

impl Cache {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Retrieves a valid result set, evicting the entry if it has expired
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<ShowRecord>> {
        let stored = match self.storage.read(&key.to_string()).await {
            Ok(stored) => stored?,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&stored) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache entry corrupt, evicting");
                self.evict(key).await;
                return None;
            }
        };

        if !entry.is_fresh(Utc::now()) {
            tracing::debug!(key = %key, stored_at = %entry.stored_at, "Cache entry expired");
            self.evict(key).await;
            return None;
        }

        tracing::debug!(key = %key, records = entry.records.len(), "Cache hit");
        Some(entry.records)
    }

    /// Stores a result set under `key`, overwriting any prior entry
    ///
    /// A capacity-rejected write triggers one bulk expiry sweep and a single
    /// retry; any other failure is logged and dropped.
    pub async fn put(&self, key: &CacheKey, records: &[ShowRecord]) {
        let entry = CacheEntry::new(records.to_vec());
        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Cache serialization failed");
                return;
            }
        };

        match self.storage.write(&key.to_string(), &json).await {
            Ok(()) => {
                tracing::debug!(key = %key, records = records.len(), "Cached result set");
            }
            Err(StorageError::Full) => {
                tracing::warn!(key = %key, "Storage full, evicting expired entries");
                self.evict_expired().await;
                if let Err(e) = self.storage.write(&key.to_string(), &json).await {
                    tracing::warn!(key = %key, error = %e, "Cache write dropped after retry");
                }
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache write dropped");
            }
        }
    }

    /// Removes every entry that fails the validity check
    pub async fn evict_expired(&self) {
        let keys = match self.storage.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "Cache enumeration failed, skipping sweep");
                return;
            }
        };

        let now = Utc::now();
        let mut evicted = 0;
        for key in keys {
            let Ok(Some(stored)) = self.storage.read(&key).await else {
                continue;
            };
            let stale = serde_json::from_str::<CacheEntry>(&stored)
                .map(|entry| !entry.is_fresh(now))
                .unwrap_or(true);
            if stale {
                if self.storage.remove(&key).await.is_ok() {
                    evicted += 1;
                }
            }
        }

        tracing::debug!(evicted, "Expired cache entries removed");
    }

    async fn evict(&self, key: &CacheKey) {
        if let Err(e) = self.storage.remove(&key.to_string()).await {
            tracing::warn!(key = %key, error = %e, "Cache eviction failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::storage::MemoryStorage;

    fn sample_records() -> Vec<ShowRecord> {
        vec![ShowRecord {
            id: "netflix-0-1700000000000-abc123def".to_string(),
            title: "Dark".to_string(),
            year: "2017".to_string(),
            critic_score: Some(95),
            audience_score: Some(92),
            summary: "A missing child unravels four families across time.".to_string(),
            watch_link: None,
            review_link: None,
            genre: "Sci-Fi".to_string(),
            source_catalog: None,
        }]
    }

    fn memory_cache() -> (Cache, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (Cache::new(storage.clone()), storage)
    }

    #[test]
    fn test_key_fingerprint_trending() {
        let key = CacheKey::Trending(Catalog::Netflix);
        assert_eq!(key.to_string(), "trending:netflix");
    }

    #[test]
    fn test_key_fingerprint_normalizes_casing_and_whitespace() {
        let a = CacheKey::Search(Catalog::Netflix, "The Matrix".to_string());
        let b = CacheKey::Search(Catalog::Netflix, "  the matrix  ".to_string());
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), "search:netflix:the matrix");
    }

    #[test]
    fn test_key_fingerprint_search_all() {
        let key = CacheKey::SearchAll(" Severance ".to_string());
        assert_eq!(key.to_string(), "search-all:severance");
    }

    #[test]
    fn test_entry_freshness_window() {
        let entry = CacheEntry::new(sample_records());
        assert!(entry.is_fresh(Utc::now()));
        assert!(entry.is_fresh(entry.stored_at + Duration::hours(23)));
        assert!(!entry.is_fresh(entry.stored_at + Duration::hours(24)));
        assert!(!entry.is_fresh(entry.stored_at + Duration::days(2)));
    }

    #[tokio::test]
    async fn test_put_then_get_round_trip() {
        let (cache, _) = memory_cache();
        let key = CacheKey::Trending(Catalog::Hulu);
        let records = sample_records();

        cache.put(&key, &records).await;
        assert_eq!(cache.get(&key).await, Some(records));
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent_and_evicted() {
        let (cache, storage) = memory_cache();
        let key = CacheKey::Trending(Catalog::Hulu);

        let entry = CacheEntry {
            records: sample_records(),
            stored_at: Utc::now() - Duration::hours(25),
        };
        storage
            .write(&key.to_string(), &serde_json::to_string(&entry).unwrap())
            .await
            .unwrap();

        assert_eq!(cache.get(&key).await, None);
        // The stale entry is removed on access, not left behind
        assert_eq!(storage.read(&key.to_string()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_treated_as_miss() {
        let (cache, storage) = memory_cache();
        let key = CacheKey::SearchAll("severance".to_string());

        storage.write(&key.to_string(), "not json").await.unwrap();
        assert_eq!(cache.get(&key).await, None);
        assert_eq!(storage.read(&key.to_string()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_full_storage_triggers_sweep_and_retry() {
        let storage = Arc::new(MemoryStorage::with_capacity(1));
        let cache = Cache::new(storage.clone());

        // Seed one expired entry that occupies the only slot
        let stale = CacheEntry {
            records: sample_records(),
            stored_at: Utc::now() - Duration::hours(30),
        };
        storage
            .write("trending:max", &serde_json::to_string(&stale).unwrap())
            .await
            .unwrap();

        let key = CacheKey::Trending(Catalog::Netflix);
        let records = sample_records();
        cache.put(&key, &records).await;

        // The sweep freed the slot and the retry succeeded
        assert_eq!(cache.get(&key).await, Some(records));
        assert_eq!(storage.read("trending:max").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites_prior_entry() {
        let (cache, _) = memory_cache();
        let key = CacheKey::Search(Catalog::DisneyPlus, "andor".to_string());

        let mut records = sample_records();
        cache.put(&key, &records).await;

        records[0].title = "Andor".to_string();
        cache.put(&key, &records).await;

        let cached = cache.get(&key).await.unwrap();
        assert_eq!(cached[0].title, "Andor");
    }
}
