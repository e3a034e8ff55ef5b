use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use salewatch_core::Result;

/// A named JSON store: one file, one flat string-keyed map.
///
/// `BTreeMap` keeps iteration order and on-disk output deterministic.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    name: String,
}

impl JsonStore {
    /// Bind a store named `name` to `<dir>/<name>.json`. No I/O happens
    /// until the first `load`/`save`.
    pub fn open(dir: &Path, name: &str) -> Self {
        Self {
            path: dir.join(format!("{name}.json")),
            name: name.to_string(),
        }
    }

    /// Read and parse the store. Failures are typed: a missing file
    /// surfaces as `Io`, corrupt content as `Serialization`.
    pub fn load<V: DeserializeOwned>(&self) -> Result<BTreeMap<String, V>> {
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Read the store, substituting an empty map for any failure. This is
    /// the recovery policy the runtime uses: a missing or unreadable store
    /// never stops the bot.
    pub fn load_or_default<V: DeserializeOwned>(&self) -> BTreeMap<String, V> {
        match self.load() {
            Ok(map) => map,
            Err(salewatch_core::SalewatchError::Io(ref e))
                if e.kind() == std::io::ErrorKind::NotFound =>
            {
                debug!(store = %self.name, "store file not found, starting empty");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(store = %self.name, error = %e, "store unreadable, starting empty");
                BTreeMap::new()
            }
        }
    }

    /// Serialize the full map and overwrite the store file. The parent
    /// directory is created on demand.
    pub fn save<V: Serialize>(&self, map: &BTreeMap<String, V>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store name (file stem).
    pub fn name(&self) -> &str {
        &self.name
    }
}
