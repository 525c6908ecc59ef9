use chrono::{DateTime, Utc};
use pool_store::{PoolController, PoolRepository};
use pool_types::{PartialPool, Pool};
use serde::{Deserialize, Serialize};

use crate::import::adopt_pool;

/// Envelope tag for file exports.
pub const EXPORT_TYPE: &str = "powerball.ru/pool";
/// Current file export format version.
pub const EXPORT_VERSION: u32 = 2;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportEnvelope<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    version: u32,
    exported_at: DateTime<Utc>,
    pool: &'a Pool,
}

/// Wraps the full pool in the typed envelope as formatted JSON, ready to
/// be offered as a downloadable file.
pub fn export_pool(pool: &Pool) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ExportEnvelope {
        kind: EXPORT_TYPE,
        version: EXPORT_VERSION,
        exported_at: Utc::now(),
        pool,
    })
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    pool: Option<PartialPool>,
}

/// Permissive reader for the file envelope: `None` unless the text is
/// JSON carrying the expected tag and a pool object. Missing pool fields
/// are handled later by normalization, so older exports stay readable.
pub fn parse_export(text: &str) -> Option<PartialPool> {
    let raw: RawEnvelope = serde_json::from_str(text).ok()?;
    if raw.kind.as_deref() != Some(EXPORT_TYPE) {
        return None;
    }
    raw.pool
}

/// Parses an uploaded export file and adopts the pool into the local
/// store, resolving id collisions per [`crate::ImportDecision`].
pub fn import_pool<R: PoolRepository>(
    controller: &PoolController<R>,
    text: &str,
) -> Option<Pool> {
    adopt_pool(controller, parse_export(text)?)
}
