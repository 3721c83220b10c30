//! Single-file JSON cache
//!
//! The whole snapshot lives in `<cache_path>/ansible-prism_central.cache`.
//! Freshness is decided by the file modification time alone. Writes are a
//! plain overwrite with no locking: concurrent runs against the same cache
//! path may race.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use pcinv_api::Resource;

use crate::error::CoreError;

/// Cache file name inside the cache directory
pub const CACHE_FILE_NAME: &str = "ansible-prism_central.cache";

/// Persisted state: raw collections plus the last built inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    #[serde(default)]
    pub data: IndexMap<Resource, Value>,
    #[serde(default = "empty_object")]
    pub inventory: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Default for CacheSnapshot {
    fn default() -> Self {
        Self {
            data: IndexMap::new(),
            inventory: empty_object(),
        }
    }
}

/// Reads and writes the cache file
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Store for the cache file inside `cache_dir`
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            path: cache_dir.as_ref().join(CACHE_FILE_NAME),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Whether the file exists and `mtime + max_age` is still ahead of now
    #[must_use]
    pub fn is_valid(&self, max_age: u64) -> bool {
        self.is_valid_at(max_age, Utc::now())
    }

    /// [`is_valid`](Self::is_valid) against an explicit clock
    #[must_use]
    pub fn is_valid_at(&self, max_age: u64, now: DateTime<Utc>) -> bool {
        let Some(modified) = self.modified() else {
            return false;
        };
        let expires = i64::try_from(max_age)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|age| modified.checked_add_signed(age));
        match expires {
            Some(expires) => expires > now,
            // max_age beyond the representable range never expires
            None => true,
        }
    }

    fn modified(&self) -> Option<DateTime<Utc>> {
        let metadata = std::fs::metadata(&self.path).ok()?;
        if !metadata.is_file() {
            return None;
        }
        metadata.modified().ok().map(DateTime::<Utc>::from)
    }

    /// Read the snapshot; an unreadable or corrupt file yields an empty one
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> CacheSnapshot {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "cannot read cache, using empty snapshot");
                return CacheSnapshot::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(snapshot) => {
                debug!("cache loaded");
                snapshot
            }
            Err(e) => {
                warn!(error = %e, "corrupt cache, using empty snapshot");
                CacheSnapshot::default()
            }
        }
    }

    /// Overwrite the cache file with `snapshot`
    ///
    /// # Errors
    /// Returns `CacheWrite` if serialization or the write fails.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn save(&self, snapshot: &CacheSnapshot) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| CoreError::CacheWrite(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| CoreError::CacheWrite(format!("{}: {e}", self.path.display())))?;
        debug!("cache written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs::File;
    use std::time::{Duration, SystemTime};

    const MTIME: i64 = 1_700_000_000;

    fn store_with_mtime(dir: &Path) -> CacheStore {
        let store = CacheStore::new(dir);
        let file = File::create(store.path()).unwrap();
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(MTIME.unsigned_abs());
        file.set_modified(mtime).unwrap();
        store
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_missing_file_is_never_valid() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        assert!(!store.exists());
        for max_age in [0, 60, u64::MAX] {
            assert!(!store.is_valid(max_age));
            assert!(!store.is_valid_at(max_age, at(0)));
        }
    }

    #[test]
    fn test_validity_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_mtime(dir.path());

        assert!(store.is_valid_at(60, at(MTIME + 59)));
        assert!(!store.is_valid_at(60, at(MTIME + 60)));
        assert!(!store.is_valid_at(60, at(MTIME + 61)));
        assert!(!store.is_valid_at(0, at(MTIME)));
        assert!(store.is_valid_at(u64::MAX, at(MTIME + 1_000_000)));
    }

    #[test]
    fn test_directory_is_not_a_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(CACHE_FILE_NAME)).unwrap();
        let store = CacheStore::new(dir.path());
        assert!(!store.exists());
        assert!(!store.is_valid(u64::MAX));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let mut snapshot = CacheSnapshot::default();
        snapshot
            .data
            .insert(Resource::Clusters, json!({"entities": [{"name": "c1"}]}));
        snapshot.inventory = json!({"all": {"hosts": [], "vars": {}}});

        store.save(&snapshot).unwrap();
        assert!(store.is_valid(60));
        assert_eq!(store.load(), snapshot);

        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["data"]["clusters"]["entities"][0]["name"], json!("c1"));
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load(), CacheSnapshot::default());
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = CacheStore::new(dir.path()).load();
        assert!(snapshot.data.is_empty());
        assert_eq!(snapshot.inventory, json!({}));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("absent"));
        let err = store.save(&CacheSnapshot::default()).unwrap_err();
        assert!(matches!(err, CoreError::CacheWrite(_)));
    }
}
