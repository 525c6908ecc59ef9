use pool_types::{Pool, ShareMode};
use serde::Serialize;

/// One participant's derived payout share. Never persisted; always
/// recomputed from current pool state.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedShare {
    pub participant_id: String,
    /// Percent of the bank, rounded to 2 decimals.
    pub percent: f64,
    /// Currency amount, rounded to 2 decimals.
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareBreakdown {
    pub shares: Vec<ComputedShare>,
    /// round2 of the percent sum. Exactly 100 in equal/by-contribution
    /// modes; under manual mode callers must check it themselves.
    pub percent_sum: f64,
}

/// Rounds half-away-from-zero at 2 decimals, with an epsilon nudge to
/// counter binary representation error (0.145 * 100 = 14.499999...).
pub fn round2(x: f64) -> f64 {
    ((x + f64::EPSILON) * 100.0).round() / 100.0
}

/// Derives the percent/amount breakdown for every participant.
///
/// Percentages are truncated to 2 decimals and the last participant in
/// insertion order absorbs the remainder, so the sum is exactly 100
/// regardless of rounding loss. This order-dependent remainder assignment
/// is a deliberate tie-break and must not be replaced with per-participant
/// rounding.
pub fn compute_shares(pool: &Pool) -> ShareBreakdown {
    let n = pool.participants.len();
    if n == 0 {
        return ShareBreakdown {
            shares: Vec::new(),
            percent_sum: 0.0,
        };
    }
    let bank = pool.bank();

    let percents = match pool.share_mode {
        ShareMode::Equal => equal_percents(n),
        ShareMode::ByContrib => {
            let totals: Vec<f64> = pool
                .participants
                .iter()
                .map(|p| pool.contribution_total(&p.id))
                .collect();
            let total: f64 = totals.iter().sum();
            if total <= 0.0 {
                // nothing contributed yet; fall back to equal split
                equal_percents(n)
            } else {
                proportional_percents(&totals, total)
            }
        }
        ShareMode::Manual => pool
            .participants
            .iter()
            .map(|p| {
                pool.manual_overrides
                    .get(&p.id)
                    .copied()
                    .unwrap_or(0.0)
                    .max(0.0)
            })
            .collect(),
    };

    let shares: Vec<ComputedShare> = pool
        .participants
        .iter()
        .zip(&percents)
        .map(|(p, &percent)| ComputedShare {
            participant_id: p.id.clone(),
            percent: round2(percent),
            amount: round2(percent * bank / 100.0),
        })
        .collect();
    let percent_sum = round2(shares.iter().map(|s| s.percent).sum());
    ShareBreakdown {
        shares,
        percent_sum,
    }
}

/// First n−1 entries get `floor(10000/n)/100`; the last absorbs the
/// remainder down from 100.
fn equal_percents(n: usize) -> Vec<f64> {
    let base = (10000.0 / n as f64).floor() / 100.0;
    let mut percents = vec![base; n];
    percents[n - 1] = (100.0 - base * (n - 1) as f64).max(0.0);
    percents
}

fn proportional_percents(totals: &[f64], total: f64) -> Vec<f64> {
    let n = totals.len();
    let mut percents = Vec::with_capacity(n);
    let mut acc = 0.0;
    for (idx, amount) in totals.iter().enumerate() {
        if idx < n - 1 {
            let p = ((amount / total) * 10000.0).floor() / 100.0;
            percents.push(p);
            acc += p;
        } else {
            percents.push((100.0 - acc).max(0.0));
        }
    }
    percents
}
