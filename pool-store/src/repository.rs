use std::collections::HashMap;

use parking_lot::RwLock;
use pool_types::Pool;

use crate::error::Result;

/// Key-value seam over the durable pool collection, keyed by pool id.
///
/// Reads never fail: a backend that cannot produce usable data reports an
/// empty collection. Writes are last-write-wins upserts with no
/// concurrency check; the model assumes one active editor per pool id.
pub trait PoolRepository: Send + Sync {
    fn get(&self, id: &str) -> Option<Pool>;
    /// All pools, in no particular order; callers sort by recency.
    fn list(&self) -> Vec<Pool>;
    fn save(&self, pool: &Pool) -> Result<()>;
}

/// In-process backend, used by tests and as a scratch store.
#[derive(Default)]
pub struct MemoryStore {
    pools: RwLock<HashMap<String, Pool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PoolRepository for MemoryStore {
    fn get(&self, id: &str) -> Option<Pool> {
        self.pools.read().get(id).cloned()
    }

    fn list(&self) -> Vec<Pool> {
        self.pools.read().values().cloned().collect()
    }

    fn save(&self, pool: &Pool) -> Result<()> {
        self.pools.write().insert(pool.id.clone(), pool.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pool_types::PartialPool;

    #[test]
    fn upsert_overwrites_by_id() {
        let store = MemoryStore::new();
        let mut pool = PartialPool::default().normalize(Utc::now());
        store.save(&pool).unwrap();
        pool.name = "renamed".to_string();
        store.save(&pool).unwrap();
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.get(&pool.id).unwrap().name, "renamed");
    }

    #[test]
    fn missing_id_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("nope").is_none());
    }
}
