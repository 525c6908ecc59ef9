use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    id::new_id,
    pool::{
        Contribution, ManualOverrides, Participant, Pool, ShareMode, DEFAULT_POOL_NAME,
        DEFAULT_PRICE_PER,
    },
    selection::Selection,
};

/// Pool record as read from an export envelope or an older snapshot:
/// every field that a previous format version may lack is optional.
///
/// Parsing bytes into this shape and filling defaults are deliberately
/// separate steps, so a malformed payload (parse failure) is
/// distinguishable from an incomplete one (normalized with defaults).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialPool {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "drawDateISO")]
    pub draw_date: Option<DateTime<Utc>>,
    pub price_per: Option<f64>,
    pub tickets: Option<Vec<Selection>>,
    pub participants: Option<Vec<Participant>>,
    pub contributions: Option<Vec<Contribution>>,
    pub share_mode: Option<ShareMode>,
    pub manual_overrides: Option<ManualOverrides>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PartialPool {
    /// Produces a complete, invariant-satisfying [`Pool`], filling every
    /// missing field with its documented default.
    pub fn normalize(self, now: DateTime<Utc>) -> Pool {
        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_POOL_NAME.to_string(),
        };
        let price_per = match self.price_per {
            Some(price) if price.is_finite() => price,
            _ => DEFAULT_PRICE_PER,
        };
        let mut pool = Pool {
            id: self.id.unwrap_or_else(new_id),
            name,
            draw_date: self.draw_date.unwrap_or(now),
            price_per,
            tickets: Vec::new(),
            participants: self.participants.unwrap_or_default(),
            contributions: self.contributions.unwrap_or_default(),
            share_mode: self.share_mode.unwrap_or_default(),
            manual_overrides: self.manual_overrides.unwrap_or_default(),
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        };
        pool.set_tickets(self.tickets.unwrap_or_default());
        pool
    }
}

impl From<Pool> for PartialPool {
    fn from(pool: Pool) -> Self {
        Self {
            id: Some(pool.id),
            name: Some(pool.name),
            draw_date: Some(pool.draw_date),
            price_per: Some(pool.price_per),
            tickets: Some(pool.tickets),
            participants: Some(pool.participants),
            contributions: Some(pool.contributions),
            share_mode: Some(pool.share_mode),
            manual_overrides: Some(pool.manual_overrides),
            created_at: Some(pool.created_at),
            updated_at: Some(pool.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_normalizes_to_defaults() {
        let now = Utc::now();
        let pool = PartialPool::default().normalize(now);
        assert!(!pool.id.is_empty());
        assert_eq!(pool.name, DEFAULT_POOL_NAME);
        assert_eq!(pool.price_per, DEFAULT_PRICE_PER);
        assert_eq!(pool.tickets, vec![Selection::empty()]);
        assert!(pool.participants.is_empty());
        assert!(pool.contributions.is_empty());
        assert_eq!(pool.share_mode, ShareMode::Equal);
        assert!(pool.manual_overrides.is_empty());
        assert_eq!(pool.created_at, now);
        assert_eq!(pool.updated_at, now);
    }

    #[test]
    fn version_one_payload_gains_newer_fields() {
        // A v1 snapshot predates contributions, shareMode, and overrides.
        let text = r#"{
            "id": "p-1",
            "name": "Офис",
            "drawDateISO": "2025-01-01T00:00:00Z",
            "pricePer": 2.5,
            "tickets": [{"numbers": [1, 2, 3, 4, 5], "power": 6}]
        }"#;
        let partial: PartialPool = serde_json::from_str(text).unwrap();
        let pool = partial.normalize(Utc::now());
        assert_eq!(pool.id, "p-1");
        assert_eq!(pool.price_per, 2.5);
        assert!(pool.tickets[0].is_complete());
        assert_eq!(pool.share_mode, ShareMode::Equal);
        assert!(pool.contributions.is_empty());
        assert!(pool.manual_overrides.is_empty());
    }

    #[test]
    fn blank_name_falls_back_to_default() {
        let partial = PartialPool {
            name: Some("   ".to_string()),
            ..PartialPool::default()
        };
        assert_eq!(partial.normalize(Utc::now()).name, DEFAULT_POOL_NAME);
    }

    #[test]
    fn round_trips_through_partial_form() {
        let now = Utc::now();
        let mut pool = PartialPool::default().normalize(now);
        pool.add_participant("a");
        let back = PartialPool::from(pool.clone()).normalize(now);
        assert_eq!(back, pool);
    }
}
