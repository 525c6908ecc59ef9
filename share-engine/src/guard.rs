use pool_types::Pool;
use serde::Serialize;
use thiserror::Error;

/// Largest tolerated gap between the bank and the contributed sum.
///
/// The comparison is done on raw f64 values, so a nominal one-cent gap
/// (25.00 vs 24.99) lands just above the tolerance and fails, while a
/// reconciled ledger passes.
pub const BANK_TOLERANCE: f64 = 0.01;

/// One blocking reason reported by the guard. All applicable issues are
/// reported together rather than short-circuiting on the first.
#[derive(Clone, Debug, PartialEq, Error, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Issue {
    #[error("not every ticket has 5 numbers and a power value")]
    IncompleteTickets,
    #[error("bank {bank:.2} does not match contributions {contributed:.2} (delta {delta:+.2})")]
    BankMismatch {
        bank: f64,
        contributed: f64,
        delta: f64,
    },
    #[error("some participants have a missing or invalid email")]
    InvalidEmails,
}

/// Guard outcome over one pool snapshot plus its derived contribution sum.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub tickets_valid: bool,
    pub bank_matches: bool,
    pub emails_valid: bool,
    /// Advisory only: a missing holder warns but does not block export.
    pub has_holder: bool,
    pub bank: f64,
    pub contributed: f64,
    /// contributed − bank.
    pub delta: f64,
}

impl ValidationReport {
    /// True when all three blocking checks pass (holder is advisory).
    pub fn export_ready(&self) -> bool {
        self.tickets_valid && self.bank_matches && self.emails_valid
    }

    /// Every blocking reason that currently applies.
    pub fn blocking_issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        if !self.tickets_valid {
            issues.push(Issue::IncompleteTickets);
        }
        if !self.bank_matches {
            issues.push(Issue::BankMismatch {
                bank: self.bank,
                contributed: self.contributed,
                delta: self.delta,
            });
        }
        if !self.emails_valid {
            issues.push(Issue::InvalidEmails);
        }
        issues
    }
}

/// Runs all checks required before export, share-link, and agreement
/// generation.
pub fn validate_pool(pool: &Pool) -> ValidationReport {
    let bank = pool.bank();
    let contributed = pool.contributions_sum();
    let delta = contributed - bank;
    ValidationReport {
        tickets_valid: pool.tickets.iter().all(|t| t.is_complete()),
        bank_matches: delta.abs() <= BANK_TOLERANCE,
        emails_valid: pool
            .participants
            .iter()
            .all(|p| p.email.as_deref().is_some_and(email_valid)),
        has_holder: pool.has_holder(),
        bank,
        contributed,
        delta,
    }
}

/// Single-@ address shape: `local@domain.tld`, no whitespace, with a dot
/// strictly inside the domain part.
fn email_valid(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = s.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pool_types::{ParticipantUpdate, PartialPool, Selection};

    fn complete_ticket() -> Selection {
        Selection {
            numbers: vec![3, 17, 25, 41, 68],
            power: Some(12),
        }
    }

    fn funded_pool() -> Pool {
        // 5 tickets x 5.0 = 25.0 bank
        let mut pool = PartialPool::default().normalize(Utc::now());
        pool.set_tickets(vec![complete_ticket(); 5]);
        let a = pool.add_participant("a");
        pool.update_participant(
            &a,
            ParticipantUpdate {
                email: Some("a@example.com".to_string()),
                ..ParticipantUpdate::default()
            },
        );
        pool.set_contribution_total(&a, 25.0, Utc::now());
        pool
    }

    #[test]
    fn funded_pool_is_export_ready() {
        let report = validate_pool(&funded_pool());
        assert!(report.tickets_valid);
        assert!(report.bank_matches);
        assert!(report.emails_valid);
        assert!(report.has_holder);
        assert!(report.export_ready());
        assert!(report.blocking_issues().is_empty());
    }

    #[test]
    fn four_number_ticket_fails_tickets_valid() {
        let mut pool = funded_pool();
        pool.tickets[0].numbers.pop();
        let report = validate_pool(&pool);
        assert!(!report.tickets_valid);
        assert!(!report.export_ready());
        assert_eq!(report.blocking_issues(), vec![Issue::IncompleteTickets]);
    }

    #[test]
    fn missing_power_fails_tickets_valid() {
        let mut pool = funded_pool();
        pool.tickets[2].power = None;
        assert!(!validate_pool(&pool).tickets_valid);
    }

    #[test]
    fn one_cent_gap_fails_bank_match() {
        let mut pool = funded_pool();
        let id = pool.participants[0].id.clone();
        pool.set_contribution_total(&id, 24.99, Utc::now());
        // 25.0 - 24.99 lands just above 0.01 in f64, so the boundary fails
        let report = validate_pool(&pool);
        assert!(!report.bank_matches);
        assert!(matches!(
            report.blocking_issues().as_slice(),
            [Issue::BankMismatch { .. }]
        ));
    }

    #[test]
    fn exact_match_passes_bank_match() {
        let report = validate_pool(&funded_pool());
        assert!(report.bank_matches);
        assert_eq!(report.delta, 0.0);
    }

    #[test]
    fn sub_cent_slack_passes_bank_match() {
        let mut pool = funded_pool();
        let id = pool.participants[0].id.clone();
        pool.set_contribution_total(&id, 24.995, Utc::now());
        assert!(validate_pool(&pool).bank_matches);
    }

    #[test]
    fn missing_email_fails_and_reports_all_issues_at_once() {
        let mut pool = funded_pool();
        pool.tickets[0].numbers.clear();
        let b = pool.add_participant("b");
        pool.set_contribution_total(&b, 100.0, Utc::now());
        let report = validate_pool(&pool);
        let issues = report.blocking_issues();
        assert_eq!(issues.len(), 3);
        assert!(issues.contains(&Issue::IncompleteTickets));
        assert!(issues.contains(&Issue::InvalidEmails));
    }

    #[test]
    fn missing_holder_is_advisory_only() {
        let mut pool = funded_pool();
        let id = pool.participants[0].id.clone();
        pool.set_participant_role(&id, pool_types::Role::Member);
        let report = validate_pool(&pool);
        assert!(!report.has_holder);
        assert!(report.export_ready());
    }

    #[test]
    fn email_shape_checks() {
        for good in ["name@example.com", "a.b@mail.co", "x@sub.domain.org"] {
            assert!(email_valid(good), "{good}");
        }
        for bad in [
            "",
            "name",
            "name@",
            "@example.com",
            "name@example",
            "name@.com",
            "name@com.",
            "na me@example.com",
            "name@@example.com",
            "name@exa mple.com",
        ] {
            assert!(!email_valid(bad), "{bad}");
        }
    }
}
