//! Core data model for jointly funded lottery ticket pools.
//!
//! The crate exposes:
//! - [`Pool`]: aggregate root holding tickets, participants, and the
//!   contribution ledger.
//! - [`Selection`]: a single ticket's number pick plus generators.
//! - [`PartialPool`]: permissive form of a pool record as read from older
//!   or incomplete snapshots, with an explicit normalization step.

pub mod id;
pub mod normalize;
pub mod pool;
pub mod selection;

pub use id::new_id;
pub use normalize::PartialPool;
pub use pool::{
    Contribution, ManualOverrides, Participant, ParticipantUpdate, Pool, Role, ShareMode,
    DEFAULT_POOL_NAME, DEFAULT_PRICE_PER, MAX_TICKETS, MIN_TICKETS,
};
pub use selection::{Selection, MAIN_PICKS, MAIN_POOL_MAX, POWER_MAX};
