use chrono::{DateTime, Utc};
use log::warn;
use pool_store::{PoolController, PoolRepository};
use pool_types::{PartialPool, Pool};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    digest::{digest_hex_upper, pool_digest},
    import::adopt_pool,
    packing::{pack, unpack},
};

/// Envelope tag for share-link payloads.
pub const LINK_TYPE: &str = "powerball.ru/pool-link";
/// Current link payload format version.
pub const LINK_VERSION: u32 = 1;

/// Decode/encode failures, each with a stable machine-readable code that
/// the import surface shows verbatim.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("link fragment carries no data parameter")]
    NoData,
    #[error("link payload failed to decompress")]
    DecodeFailed,
    #[error("link payload is not valid JSON")]
    ParseFailed,
    #[error("link payload has an unexpected shape")]
    InvalidFormat,
    #[error("link payload could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("link payload could not be compressed: {0}")]
    Compress(#[from] std::io::Error),
}

impl LinkError {
    pub fn code(&self) -> &'static str {
        match self {
            LinkError::NoData => "no_data",
            LinkError::DecodeFailed => "decode_failed",
            LinkError::ParseFailed => "parse_failed",
            LinkError::InvalidFormat => "invalid_format",
            LinkError::Encode(_) => "encode_failed",
            LinkError::Compress(_) => "compress_failed",
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LinkEnvelope<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    version: u32,
    exported_at: DateTime<Utc>,
    digest: String,
    pool: &'a Pool,
}

/// Decoded link payload. The pool is kept in partial form; callers adopt
/// it through [`import_link_pool`] or verify `digest` first.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkData {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub digest: String,
    pub pool: PartialPool,
}

/// Builds `<origin>/pool/import#d=<packed>` carrying the whole snapshot
/// plus its uppercase-hex digest. A digest computation failure degrades to
/// an empty digest rather than aborting link generation.
pub fn build_smart_link(pool: &Pool, origin: &str) -> Result<String, LinkError> {
    let digest = match pool_digest(pool) {
        Ok(digest) => digest_hex_upper(&digest),
        Err(err) => {
            warn!("digest unavailable for share link of pool {}: {err}", pool.id);
            String::new()
        }
    };
    let payload = serde_json::to_string(&LinkEnvelope {
        kind: LINK_TYPE,
        version: LINK_VERSION,
        exported_at: Utc::now(),
        digest,
        pool,
    })?;
    let packed = pack(&payload)?;
    Ok(format!(
        "{}/pool/import#d={packed}",
        origin.trim_end_matches('/')
    ))
}

/// Decodes a URL fragment (or a whole URL) produced by
/// [`build_smart_link`]. Every failure stage maps to a distinct
/// [`LinkError`]; nothing panics on hostile input.
pub fn unpack_smart_link_data(fragment: &str) -> Result<LinkData, LinkError> {
    let packed = extract_data_param(fragment).ok_or(LinkError::NoData)?;
    let decoded = unpack(packed).ok_or(LinkError::DecodeFailed)?;
    let value: serde_json::Value =
        serde_json::from_str(&decoded).map_err(|_| LinkError::ParseFailed)?;
    let tagged = value.get("type").and_then(|v| v.as_str()) == Some(LINK_TYPE);
    let has_pool = value.get("pool").is_some_and(|p| p.is_object());
    if !tagged || !has_pool {
        return Err(LinkError::InvalidFormat);
    }
    serde_json::from_value(value).map_err(|_| LinkError::InvalidFormat)
}

/// Adopts a decoded link payload into the local store under the same
/// duplicate-id rule as file import.
pub fn import_link_pool<R: PoolRepository>(
    controller: &PoolController<R>,
    data: LinkData,
) -> Option<Pool> {
    adopt_pool(controller, data.pool)
}

/// Finds the `d=` parameter after `#` or `&`; the value runs to the next
/// `&` or the end of the string and must be non-empty.
fn extract_data_param(fragment: &str) -> Option<&str> {
    for (i, _) in fragment.match_indices("d=") {
        if i == 0 {
            continue;
        }
        let lead = fragment.as_bytes()[i - 1];
        if lead != b'#' && lead != b'&' {
            continue;
        }
        let value = &fragment[i + 2..];
        let end = value.find('&').unwrap_or(value.len());
        if end > 0 {
            return Some(&value[..end]);
        }
    }
    None
}
