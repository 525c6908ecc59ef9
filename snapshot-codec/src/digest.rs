use chrono::{DateTime, Utc};
use pool_types::{ManualOverrides, Pool, Role, Selection, ShareMode};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Canonical projection of a pool: the exact byte input to the content
/// digest. Field order is fixed by the struct definition; the contribution
/// ledger detail and participant notes are deliberately excluded as
/// irrelevant to the agreement's integrity.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DigestInput<'a> {
    version: u32,
    id: &'a str,
    name: &'a str,
    #[serde(rename = "drawDateISO")]
    draw_date: &'a DateTime<Utc>,
    price_per: f64,
    tickets: &'a [Selection],
    participants: Vec<DigestParticipant<'a>>,
    share_mode: ShareMode,
    manual_overrides: &'a ManualOverrides,
    created_at: &'a DateTime<Utc>,
    updated_at: &'a DateTime<Utc>,
}

#[derive(Serialize)]
struct DigestParticipant<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    role: Role,
}

const DIGEST_VERSION: u32 = 1;

/// SHA-256 over the canonical JSON text of the pool.
pub fn pool_digest(pool: &Pool) -> Result<[u8; 32], serde_json::Error> {
    let input = DigestInput {
        version: DIGEST_VERSION,
        id: &pool.id,
        name: &pool.name,
        draw_date: &pool.draw_date,
        price_per: pool.price_per,
        tickets: &pool.tickets,
        participants: pool
            .participants
            .iter()
            .map(|p| DigestParticipant {
                id: &p.id,
                name: &p.name,
                email: p.email.as_deref(),
                role: p.role,
            })
            .collect(),
        share_mode: pool.share_mode,
        manual_overrides: &pool.manual_overrides,
        created_at: &pool.created_at,
        updated_at: &pool.updated_at,
    };
    let text = serde_json::to_string(&input)?;
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    Ok(hasher.finalize().into())
}

/// Lowercase hex, the agreement-view convention.
pub fn digest_hex_lower(digest: &[u8; 32]) -> String {
    hex::encode(digest)
}

/// Uppercase hex, the share-link convention.
pub fn digest_hex_upper(digest: &[u8; 32]) -> String {
    hex::encode_upper(digest)
}

/// Digest as rendered in the agreement view.
pub fn agreement_digest(pool: &Pool) -> Result<String, serde_json::Error> {
    Ok(digest_hex_lower(&pool_digest(pool)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pool_types::PartialPool;

    fn pool() -> Pool {
        let mut pool = PartialPool::default().normalize(Utc::now());
        pool.tickets[0] = Selection {
            numbers: vec![4, 8, 15, 16, 23],
            power: Some(13),
        };
        let a = pool.add_participant("Анна");
        pool.set_contribution_total(&a, 5.0, Utc::now());
        pool
    }

    #[test]
    fn digest_is_deterministic() {
        let pool = pool();
        assert_eq!(pool_digest(&pool).unwrap(), pool_digest(&pool).unwrap());
    }

    #[test]
    fn single_field_change_changes_digest() {
        let pool = pool();
        let before = pool_digest(&pool).unwrap();
        let mut changed = pool.clone();
        changed.tickets[0].numbers[0] = 5;
        assert_ne!(before, pool_digest(&changed).unwrap());

        let mut renamed = pool.clone();
        renamed.name.push('!');
        assert_ne!(before, pool_digest(&renamed).unwrap());
    }

    #[test]
    fn contribution_detail_is_outside_the_projection() {
        let pool = pool();
        let before = pool_digest(&pool).unwrap();
        let mut funded = pool.clone();
        let id = funded.participants[0].id.clone();
        funded.set_contribution_total(&id, 999.0, Utc::now());
        assert_eq!(before, pool_digest(&funded).unwrap());
    }

    #[test]
    fn participant_note_is_outside_the_projection() {
        let pool = pool();
        let before = pool_digest(&pool).unwrap();
        let mut noted = pool.clone();
        noted.participants[0].note = Some("писать в телеграм".to_string());
        assert_eq!(before, pool_digest(&noted).unwrap());
    }

    #[test]
    fn participant_email_is_inside_the_projection() {
        let pool = pool();
        let before = pool_digest(&pool).unwrap();
        let mut mailed = pool.clone();
        mailed.participants[0].email = Some("a@example.com".to_string());
        assert_ne!(before, pool_digest(&mailed).unwrap());
    }

    #[test]
    fn hex_casings_agree_on_bytes() {
        let digest = pool_digest(&pool()).unwrap();
        let lower = digest_hex_lower(&digest);
        let upper = digest_hex_upper(&digest);
        assert_eq!(lower.len(), 64);
        assert_eq!(lower.to_uppercase(), upper);
        assert!(lower.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
