//! Persistence and ledger operations for pools.
//!
//! The crate exposes:
//! - [`PoolRepository`]: injectable key-value seam over the durable copy.
//! - [`MemoryStore`] / [`JsonFileStore`]: in-process and file backends.
//! - [`PoolController`]: the only path that persists — every mutation goes
//!   through its `save`, which stamps `updated_at`.

pub mod controller;
pub mod error;
pub mod file;
pub mod repository;

pub use controller::{CreatePool, PoolController};
pub use error::{Result, StoreError};
pub use file::JsonFileStore;
pub use repository::{MemoryStore, PoolRepository};
