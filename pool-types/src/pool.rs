use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{id::new_id, selection::Selection};

/// Smallest allowed ticket count per pool.
pub const MIN_TICKETS: usize = 1;
/// Largest allowed ticket count per pool.
pub const MAX_TICKETS: usize = 10;
/// Ticket price used when the creator does not specify one.
pub const DEFAULT_PRICE_PER: f64 = 5.0;
/// Name used when the creator leaves the field blank.
pub const DEFAULT_POOL_NAME: &str = "Без названия";

/// Participant role within a pool.
///
/// The holder physically purchases and custodies the ticket; everyone else
/// is a member. At most one participant holds at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Holder,
    Member,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Field updates applied to an existing participant; `None` leaves the
/// field untouched.
#[derive(Clone, Debug, Default)]
pub struct ParticipantUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub note: Option<String>,
}

/// One contribution record. The ledger keeps records plural-shaped even
/// though [`Pool::set_contribution_total`] collapses to one record per
/// participant; aggregation always sums, so itemized payments would work
/// without a model change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub id: String,
    pub participant_id: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

/// Algorithm governing payout percentages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareMode {
    #[default]
    #[serde(rename = "equal")]
    Equal,
    #[serde(rename = "byContrib")]
    ByContrib,
    #[serde(rename = "manual")]
    Manual,
}

/// participant id -> percent, used only under [`ShareMode::Manual`].
/// BTreeMap keeps iteration and serialization order deterministic.
pub type ManualOverrides = BTreeMap<String, f64>;

/// Aggregate root for one jointly funded ticket pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub id: String,
    pub name: String,
    #[serde(rename = "drawDateISO")]
    pub draw_date: DateTime<Utc>,
    pub price_per: f64,
    pub tickets: Vec<Selection>,
    pub participants: Vec<Participant>,
    pub contributions: Vec<Contribution>,
    pub share_mode: ShareMode,
    #[serde(default)]
    pub manual_overrides: ManualOverrides,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pool {
    /// Total cost of all tickets.
    pub fn bank(&self) -> f64 {
        self.tickets.len() as f64 * self.price_per
    }

    pub fn participant(&self, participant_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    /// Appends a participant; the first one added becomes the holder.
    /// Returns the fresh participant id.
    pub fn add_participant(&mut self, name: &str) -> String {
        let role = if self.participants.is_empty() {
            Role::Holder
        } else {
            Role::Member
        };
        let id = new_id();
        self.participants.push(Participant {
            id: id.clone(),
            name: name.to_string(),
            role,
            email: None,
            note: None,
        });
        id
    }

    /// Removes the participant along with their contribution records and
    /// manual override entry.
    pub fn remove_participant(&mut self, participant_id: &str) {
        self.participants.retain(|p| p.id != participant_id);
        self.contributions
            .retain(|c| c.participant_id != participant_id);
        self.manual_overrides.remove(participant_id);
    }

    /// Assigns a role. Promoting a participant to holder demotes any other
    /// holder to member, so at most one holder exists at any time.
    pub fn set_participant_role(&mut self, participant_id: &str, role: Role) {
        if role == Role::Holder {
            for p in &mut self.participants {
                if p.id != participant_id && p.role == Role::Holder {
                    p.role = Role::Member;
                }
            }
        }
        if let Some(p) = self.participants.iter_mut().find(|p| p.id == participant_id) {
            p.role = role;
        }
    }

    pub fn update_participant(&mut self, participant_id: &str, update: ParticipantUpdate) {
        if let Some(p) = self.participants.iter_mut().find(|p| p.id == participant_id) {
            if let Some(name) = update.name {
                p.name = name;
            }
            if let Some(email) = update.email {
                p.email = Some(email);
            }
            if let Some(note) = update.note {
                p.note = Some(note);
            }
        }
    }

    /// Replaces all of the participant's contribution records with a single
    /// record carrying the new total. Negative and non-finite amounts are
    /// stored as zero.
    pub fn set_contribution_total(
        &mut self,
        participant_id: &str,
        amount: f64,
        now: DateTime<Utc>,
    ) {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.contributions
            .retain(|c| c.participant_id != participant_id);
        self.contributions.push(Contribution {
            id: new_id(),
            participant_id: participant_id.to_string(),
            amount,
            created_at: now,
        });
    }

    /// Sum of all contribution records for the participant.
    pub fn contribution_total(&self, participant_id: &str) -> f64 {
        self.contributions
            .iter()
            .filter(|c| c.participant_id == participant_id)
            .map(|c| c.amount)
            .sum()
    }

    /// Sum of the whole contribution ledger.
    pub fn contributions_sum(&self) -> f64 {
        self.contributions.iter().map(|c| c.amount).sum()
    }

    pub fn set_share_mode(&mut self, mode: ShareMode) {
        self.share_mode = mode;
    }

    /// Stores a manual percent override, clamped to be non-negative. The
    /// upper bound is a validation concern, not a storage invariant.
    pub fn set_manual_percent(&mut self, participant_id: &str, percent: f64) {
        let percent = if percent.is_finite() { percent.max(0.0) } else { 0.0 };
        self.manual_overrides
            .insert(participant_id.to_string(), percent);
    }

    /// Replaces the ticket list, clamped to the 1..=10 invariant: an empty
    /// list becomes one empty selection, excess tickets are dropped.
    pub fn set_tickets(&mut self, mut tickets: Vec<Selection>) {
        if tickets.is_empty() {
            tickets.push(Selection::empty());
        }
        tickets.truncate(MAX_TICKETS);
        self.tickets = tickets;
    }

    pub fn has_holder(&self) -> bool {
        self.participants.iter().any(|p| p.role == Role::Holder)
    }
}
