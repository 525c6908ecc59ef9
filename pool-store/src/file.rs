use std::{collections::HashMap, fs, path::PathBuf};

use log::warn;
use pool_types::Pool;

use crate::{error::Result, repository::PoolRepository};

/// File backend holding the whole collection as one JSON object,
/// `{ "<poolId>": Pool, ... }`.
///
/// The file is read in full on every operation and written back in full on
/// save; with the single-writer model there is nothing to reconcile. A
/// missing, unreadable, or unparseable file is treated as an empty
/// collection rather than an error.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_map(&self) -> HashMap<String, Pool> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(err) => {
                warn!(
                    "ignoring unparseable pool store at {:?}: {err}",
                    self.path
                );
                HashMap::new()
            }
        }
    }

    fn write_map(&self, map: &HashMap<String, Pool>) -> Result<()> {
        let json = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PoolRepository for JsonFileStore {
    fn get(&self, id: &str) -> Option<Pool> {
        self.read_map().remove(id)
    }

    fn list(&self) -> Vec<Pool> {
        self.read_map().into_values().collect()
    }

    fn save(&self, pool: &Pool) -> Result<()> {
        let mut map = self.read_map();
        map.insert(pool.id.clone(), pool.clone());
        self.write_map(&map)
    }
}
