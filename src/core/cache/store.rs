//! In-memory result store with per-entry expiry

use super::clock::Clock;
use super::key::QueryKey;
use crate::domain::{OutageRecord, YearMeta};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Snapshot of a completed fetch; clones are cheap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResult {
    pub rows: Arc<Vec<OutageRecord>>,
    pub metas: Arc<Vec<YearMeta>>,
}

#[derive(Debug)]
struct CacheEntry {
    expires_at: DateTime<Utc>,
    result: CachedResult,
}

/// TTL cache of merged search results
///
/// Expired entries are dropped when looked up; nothing sweeps in the
/// background.
pub struct ResultCache {
    entries: RwLock<HashMap<QueryKey, CacheEntry>>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365)),
            clock,
        }
    }

    /// Returns the entry for `key` if it has not expired
    pub async fn lookup(&self, key: &QueryKey) -> Option<CachedResult> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(entry) if now < entry.expires_at => {
                    tracing::debug!(query_key = %key, "Cache hit");
                    return Some(entry.result.clone());
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        // may have been refreshed while waiting for the write lock
        if let Some(entry) = entries.get(key) {
            if now < entry.expires_at {
                return Some(entry.result.clone());
            }
            entries.remove(key);
            tracing::debug!(query_key = %key, "Cache entry expired");
        }
        None
    }

    /// Stores a result, replacing any previous entry for `key`
    pub async fn store(
        &self,
        key: QueryKey,
        rows: Vec<OutageRecord>,
        metas: Vec<YearMeta>,
    ) -> CachedResult {
        let now = self.clock.now();
        let result = CachedResult {
            rows: Arc::new(rows),
            metas: Arc::new(metas),
        };
        let entry = CacheEntry {
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(now),
            result: result.clone(),
        };
        self.entries.write().await.insert(key, entry);
        result
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
