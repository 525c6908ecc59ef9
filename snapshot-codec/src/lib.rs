//! Portable encoding of pool snapshots.
//!
//! Two serialization channels share one canonicalization step:
//! - [`export_pool`] / [`import_pool`]: typed JSON envelope for file
//!   download/upload.
//! - [`build_smart_link`] / [`unpack_smart_link_data`]: the same snapshot
//!   plus its content digest, compressed into a URL fragment so a pool can
//!   be reconstructed without any server-side storage.
//!
//! The digest is SHA-256 over the UTF-8 JSON bytes of a fixed canonical
//! projection of the pool (see [`digest`]).

pub mod digest;
pub mod export;
pub mod import;
pub mod link;
pub mod packing;

pub use digest::{agreement_digest, digest_hex_lower, digest_hex_upper, pool_digest};
pub use export::{export_pool, import_pool, parse_export, EXPORT_TYPE, EXPORT_VERSION};
pub use import::{adopt_pool, ImportDecision};
pub use link::{
    build_smart_link, import_link_pool, unpack_smart_link_data, LinkData, LinkError, LINK_TYPE,
    LINK_VERSION,
};
