use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tokio::sync::Mutex;

use crate::domain::models::occurrence::Occurrence;
use crate::domain::ports::OccurrenceCache;

const MAX_ENTRIES: u64 = 10_000;

/// Shared occurrence cache on a TTL'd moka tier.
///
/// Entries become unreachable when their event is edited (the key embeds the
/// last-modified timestamp) and age out via TTL; nothing scans the tier.
/// A side index from event id to its live keys supports the best-effort
/// `invalidate` used when exceptions change.
pub struct MokaOccurrenceCache {
    entries: Cache<String, Arc<Vec<Occurrence>>>,
    keys_by_event: Mutex<HashMap<String, HashSet<String>>>,
}

impl MokaOccurrenceCache {
    pub fn new(ttl_secs: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            entries,
            keys_by_event: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl OccurrenceCache for MokaOccurrenceCache {
    async fn get(&self, key: &str) -> Option<Arc<Vec<Occurrence>>> {
        self.entries.get(key).await
    }

    async fn put(&self, event_id: &str, key: &str, occurrences: Arc<Vec<Occurrence>>) {
        self.entries.insert(key.to_string(), occurrences).await;
        let mut index = self.keys_by_event.lock().await;
        index
            .entry(event_id.to_string())
            .or_default()
            .insert(key.to_string());
    }

    async fn invalidate(&self, event_id: &str) {
        let keys = {
            let mut index = self.keys_by_event.lock().await;
            index.remove(event_id)
        };
        if let Some(keys) = keys {
            for key in keys {
                self.entries.invalidate(&key).await;
            }
        }
    }
}
