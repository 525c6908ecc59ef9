use chrono::Utc;
use log::{error, info};
use pool_store::{PoolController, PoolRepository};
use pool_types::{new_id, PartialPool, Pool};

/// How an imported pool is placed relative to the local collection.
///
/// Modeled as an explicit decision so the duplicate-id policy is testable
/// apart from the parsing logic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportDecision {
    /// The id is unused locally; keep it and the original `created_at`.
    Existing,
    /// A local pool already uses the id; import as a fresh copy under the
    /// carried id, stamping a fresh `created_at`.
    FreshCopy(String),
}

impl ImportDecision {
    pub fn resolve(id_taken: bool) -> Self {
        if id_taken {
            Self::FreshCopy(new_id())
        } else {
            Self::Existing
        }
    }
}

/// Normalizes an imported partial record, applies the duplicate-id rule,
/// and persists immediately. `updated_at` is always refreshed by the save;
/// the local copy under a colliding id is left untouched.
///
/// Returns `None` only when the repository rejects the write.
pub fn adopt_pool<R: PoolRepository>(
    controller: &PoolController<R>,
    partial: PartialPool,
) -> Option<Pool> {
    let now = Utc::now();
    let mut pool = partial.normalize(now);
    match ImportDecision::resolve(controller.get(&pool.id).is_some()) {
        ImportDecision::Existing => {}
        ImportDecision::FreshCopy(fresh) => {
            info!("pool id {} already present locally, importing as {fresh}", pool.id);
            pool.id = fresh;
            pool.created_at = now;
        }
    }
    match controller.save(&mut pool) {
        Ok(()) => Some(pool),
        Err(err) => {
            error!("failed to persist imported pool {}: {err}", pool.id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pool_store::MemoryStore;

    #[test]
    fn unused_id_is_kept() {
        assert_eq!(ImportDecision::resolve(false), ImportDecision::Existing);
    }

    #[test]
    fn taken_id_gets_a_fresh_copy() {
        match ImportDecision::resolve(true) {
            ImportDecision::FreshCopy(id) => assert!(!id.is_empty()),
            other => panic!("expected fresh copy, got {other:?}"),
        }
    }

    #[test]
    fn adopt_keeps_created_at_when_id_is_free() {
        let controller = PoolController::new(MemoryStore::new());
        let mut partial = PartialPool::default();
        partial.id = Some("imported".to_string());
        let stamp = Utc::now() - chrono::Duration::days(30);
        partial.created_at = Some(stamp);
        let pool = adopt_pool(&controller, partial).unwrap();
        assert_eq!(pool.id, "imported");
        assert_eq!(pool.created_at, stamp);
        assert!(pool.updated_at > stamp);
        assert!(controller.get("imported").is_some());
    }
}
