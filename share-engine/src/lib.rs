//! Payout share computation and pre-finalization validation.
//!
//! Both halves are pure functions of the current [`pool_types::Pool`]
//! state: shares are derived on demand and never persisted, and the guard
//! reports every failing reason at once so callers can surface them
//! together.

pub mod guard;
pub mod shares;

pub use guard::{validate_pool, Issue, ValidationReport, BANK_TOLERANCE};
pub use shares::{compute_shares, round2, ComputedShare, ShareBreakdown};
