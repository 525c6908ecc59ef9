use rand::Rng;
use serde::{Deserialize, Serialize};

/// Largest main-pool number (inclusive).
pub const MAIN_POOL_MAX: u8 = 69;
/// Main numbers per ticket.
pub const MAIN_PICKS: usize = 5;
/// Largest power number (inclusive).
pub const POWER_MAX: u8 = 26;

/// One ticket's number pick: up to five main numbers and a power number.
///
/// A selection is built incrementally in the editing flow, so both fields
/// may be partially filled; [`Selection::is_complete`] is the gate used
/// before finalization actions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub numbers: Vec<u8>,
    pub power: Option<u8>,
}

impl Selection {
    /// Selection with no numbers picked yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Uniform random pick: five distinct main numbers (ascending) plus
    /// one power number.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut candidates: Vec<u8> = (1..=MAIN_POOL_MAX).collect();
        let mut numbers = Vec::with_capacity(MAIN_PICKS);
        while numbers.len() < MAIN_PICKS {
            let i = rng.gen_range(0..candidates.len());
            numbers.push(candidates.swap_remove(i));
        }
        numbers.sort_unstable();
        let power = rng.gen_range(1..=POWER_MAX);
        Self {
            numbers,
            power: Some(power),
        }
    }

    /// Demo "hot" pick: biases central numbers and folklore-popular
    /// patterns (multiples of 7/10). Not predictive.
    pub fn hot<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let center = triangular(35.0, 30.0);
        let weight_main = |n: u8| {
            let mut bonus = 1.0;
            if n % 7 == 0 {
                bonus += 0.25;
            }
            if n % 10 == 0 {
                bonus += 0.15;
            }
            center(n) * bonus
        };
        let mut numbers = weighted_sample_distinct(rng, MAIN_POOL_MAX, MAIN_PICKS, weight_main);
        numbers.sort_unstable();

        let pb_center = triangular(13.0, 10.0);
        let weight_power = |n: u8| {
            let bonus = if matches!(n, 7 | 11 | 17) { 1.2 } else { 1.0 };
            pb_center(n) * bonus
        };
        let power = weighted_sample_distinct(rng, POWER_MAX, 1, weight_power)
            .first()
            .copied()
            .unwrap_or(13);
        Self {
            numbers,
            power: Some(power),
        }
    }

    /// Demo "cold" pick: biases the upper range and numbers people rarely
    /// play (non-dates, unpopular endings). Not predictive.
    pub fn cold<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let unpopular_ending = |n: u8| {
            if n == 7 || n == 13 || n % 5 == 0 {
                0.6
            } else {
                1.0
            }
        };
        let weight_main = |n: u8| {
            let range = if n > 31 { 1.6 } else { 0.8 };
            range * (f64::from(n) / f64::from(MAIN_POOL_MAX)) * unpopular_ending(n)
        };
        let mut numbers = weighted_sample_distinct(rng, MAIN_POOL_MAX, MAIN_PICKS, weight_main);
        numbers.sort_unstable();

        let weight_power = |n: u8| {
            let edges = if n <= 4 || n >= 22 { 1.8 } else { 0.7 };
            let avoid = if matches!(n, 7 | 13 | 21) { 0.5 } else { 1.0 };
            edges * avoid
        };
        let power = weighted_sample_distinct(rng, POWER_MAX, 1, weight_power)
            .first()
            .copied()
            .unwrap_or(1);
        Self {
            numbers,
            power: Some(power),
        }
    }

    /// Exactly five main numbers and a power value.
    pub fn is_complete(&self) -> bool {
        self.numbers.len() == MAIN_PICKS && self.power.is_some()
    }
}

fn triangular(center: f64, spread: f64) -> impl Fn(u8) -> f64 {
    move |n: u8| (1.0 - (f64::from(n) - center).abs() / spread).max(0.0)
}

/// Draws `k` distinct values from `1..=max` proportionally to `weight`,
/// re-normalizing after each draw. Weights are floored at a small positive
/// value so no candidate is ever unreachable.
fn weighted_sample_distinct<R, F>(rng: &mut R, max: u8, k: usize, weight: F) -> Vec<u8>
where
    R: Rng + ?Sized,
    F: Fn(u8) -> f64,
{
    let mut candidates: Vec<u8> = (1..=max).collect();
    let mut selected = Vec::with_capacity(k);
    for _ in 0..k {
        if candidates.is_empty() {
            break;
        }
        let weights: Vec<f64> = candidates.iter().map(|&n| weight(n).max(0.0001)).collect();
        let total: f64 = weights.iter().sum();
        let mut r = rng.gen::<f64>() * total;
        let mut idx = candidates.len() - 1;
        for (i, w) in weights.iter().enumerate() {
            r -= w;
            if r <= 0.0 {
                idx = i;
                break;
            }
        }
        selected.push(candidates.remove(idx));
    }
    selected
}
