use chrono::{DateTime, Duration, Utc};
use log::debug;
use pool_types::{
    new_id, ParticipantUpdate, Pool, Role, Selection, ShareMode, DEFAULT_POOL_NAME,
    DEFAULT_PRICE_PER, MAX_TICKETS, MIN_TICKETS,
};

use crate::{error::Result, repository::PoolRepository};

/// Inputs for [`PoolController::create`]. Unset fields take documented
/// defaults; the ticket count is clamped to the 1..=10 invariant.
#[derive(Clone, Debug)]
pub struct CreatePool {
    pub name: String,
    pub draw_date: DateTime<Utc>,
    pub price_per: Option<f64>,
    pub initial_tickets: Option<usize>,
}

/// High-level API over one repository. All durable mutations funnel
/// through [`PoolController::save`], which stamps `updated_at`; in-memory
/// [`Pool`] values held by callers are caches that must be written back.
pub struct PoolController<R: PoolRepository> {
    repo: R,
}

impl<R: PoolRepository> PoolController<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn create(&self, input: CreatePool) -> Result<Pool> {
        let now = Utc::now();
        let name = {
            let trimmed = input.name.trim();
            if trimmed.is_empty() {
                DEFAULT_POOL_NAME.to_string()
            } else {
                trimmed.to_string()
            }
        };
        let price_per = match input.price_per {
            Some(price) if price.is_finite() => price,
            _ => DEFAULT_PRICE_PER,
        };
        let ticket_count = input
            .initial_tickets
            .unwrap_or(MIN_TICKETS)
            .clamp(MIN_TICKETS, MAX_TICKETS);
        let pool = Pool {
            id: new_id(),
            name,
            draw_date: input.draw_date,
            price_per,
            tickets: vec![Selection::empty(); ticket_count],
            participants: Vec::new(),
            contributions: Vec::new(),
            share_mode: ShareMode::Equal,
            manual_overrides: Default::default(),
            created_at: now,
            updated_at: now,
        };
        // direct repo save keeps created_at == updated_at on a fresh pool
        self.repo.save(&pool)?;
        debug!("created pool {} ({} tickets)", pool.id, ticket_count);
        Ok(pool)
    }

    pub fn get(&self, id: &str) -> Option<Pool> {
        self.repo.get(id)
    }

    /// All pools, most recently touched first.
    pub fn list(&self) -> Vec<Pool> {
        let mut pools = self.repo.list();
        pools.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        pools
    }

    /// Upserts the pool, unconditionally refreshing `updated_at`. The
    /// stamp strictly advances even when the wall clock has not moved
    /// since the previous save, so recency ordering stays monotonic.
    pub fn save(&self, pool: &mut Pool) -> Result<()> {
        let mut now = Utc::now();
        if now <= pool.updated_at {
            now = pool.updated_at + Duration::milliseconds(1);
        }
        pool.updated_at = now;
        self.repo.save(pool)
    }

    pub fn add_participant(&self, pool: &mut Pool, name: &str) -> Result<String> {
        let id = pool.add_participant(name);
        self.save(pool)?;
        Ok(id)
    }

    pub fn remove_participant(&self, pool: &mut Pool, participant_id: &str) -> Result<()> {
        pool.remove_participant(participant_id);
        self.save(pool)
    }

    pub fn set_participant_role(
        &self,
        pool: &mut Pool,
        participant_id: &str,
        role: Role,
    ) -> Result<()> {
        pool.set_participant_role(participant_id, role);
        self.save(pool)
    }

    pub fn update_participant(
        &self,
        pool: &mut Pool,
        participant_id: &str,
        update: ParticipantUpdate,
    ) -> Result<()> {
        pool.update_participant(participant_id, update);
        self.save(pool)
    }

    pub fn set_contribution_total(
        &self,
        pool: &mut Pool,
        participant_id: &str,
        amount: f64,
    ) -> Result<()> {
        pool.set_contribution_total(participant_id, amount, Utc::now());
        self.save(pool)
    }

    pub fn set_share_mode(&self, pool: &mut Pool, mode: ShareMode) -> Result<()> {
        pool.set_share_mode(mode);
        self.save(pool)
    }

    pub fn set_manual_percent(
        &self,
        pool: &mut Pool,
        participant_id: &str,
        percent: f64,
    ) -> Result<()> {
        pool.set_manual_percent(participant_id, percent);
        self.save(pool)
    }

    pub fn set_tickets(&self, pool: &mut Pool, tickets: Vec<Selection>) -> Result<()> {
        pool.set_tickets(tickets);
        self.save(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    fn controller() -> PoolController<MemoryStore> {
        PoolController::new(MemoryStore::new())
    }

    fn create(ctl: &PoolController<MemoryStore>, name: &str) -> Pool {
        ctl.create(CreatePool {
            name: name.to_string(),
            draw_date: Utc::now(),
            price_per: None,
            initial_tickets: None,
        })
        .unwrap()
    }

    #[test]
    fn create_applies_defaults_and_clamps() {
        let ctl = controller();
        let pool = ctl
            .create(CreatePool {
                name: "  ".to_string(),
                draw_date: Utc::now(),
                price_per: None,
                initial_tickets: Some(25),
            })
            .unwrap();
        assert_eq!(pool.name, DEFAULT_POOL_NAME);
        assert_eq!(pool.price_per, DEFAULT_PRICE_PER);
        assert_eq!(pool.tickets.len(), MAX_TICKETS);
        assert_eq!(pool.share_mode, ShareMode::Equal);
        assert_eq!(pool.created_at, pool.updated_at);
        assert!(ctl.get(&pool.id).is_some());
    }

    #[test]
    fn save_strictly_advances_updated_at() {
        let ctl = controller();
        let mut pool = create(&ctl, "a");
        let mut last = pool.updated_at;
        for _ in 0..5 {
            ctl.save(&mut pool).unwrap();
            assert!(pool.updated_at > last);
            last = pool.updated_at;
        }
    }

    #[test]
    fn list_orders_by_recency() {
        let ctl = controller();
        let a = create(&ctl, "a");
        let b = create(&ctl, "b");
        let mut a_again = ctl.get(&a.id).unwrap();
        ctl.save(&mut a_again).unwrap();
        let ids: Vec<String> = ctl.list().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn ledger_ops_persist_through_save() {
        let ctl = controller();
        let mut pool = create(&ctl, "office");
        let p = ctl.add_participant(&mut pool, "Анна").unwrap();
        ctl.set_contribution_total(&mut pool, &p, 12.5).unwrap();
        let reloaded = ctl.get(&pool.id).unwrap();
        assert_eq!(reloaded.contribution_total(&p), 12.5);
        assert_eq!(reloaded.participants.len(), 1);
        assert_eq!(reloaded.participants[0].role, Role::Holder);
    }

    #[test]
    fn manual_percent_clamped_at_zero_only() {
        let ctl = controller();
        let mut pool = create(&ctl, "x");
        let p = ctl.add_participant(&mut pool, "a").unwrap();
        ctl.set_manual_percent(&mut pool, &p, -3.0).unwrap();
        assert_eq!(pool.manual_overrides[&p], 0.0);
        ctl.set_manual_percent(&mut pool, &p, 140.0).unwrap();
        // no upper clamp at write time; the guard reports percent sums
        assert_eq!(pool.manual_overrides[&p], 140.0);
    }
}
