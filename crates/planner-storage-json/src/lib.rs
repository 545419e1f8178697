//! File-backed [`KeyValueStore`]: one JSON document per key under
//! `<root>/store/<key>.json`, written through a temp file and renamed into place.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use planner_core::{KeyValueStore, PersistenceError};
use serde::{Deserialize, Serialize};

const STORE_DIR: &str = "store";
const ENTRY_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const QUARANTINE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    value: String,
    updated_at: DateTime<Utc>,
}

/// Durable store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates when needed) the store below `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let dir = root.as_ref().join(STORE_DIR);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        Ok(self
            .dir
            .join(format!("{}.{}", checked_key(key)?, ENTRY_EXTENSION)))
    }

    /// File names of previously quarantined documents, oldest first.
    pub fn quarantined(&self) -> Result<Vec<String>, PersistenceError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.contains("_corrupt_") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.entry_path(key)?;
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let entry: StoredEntry = serde_json::from_str(&data)?;
        if entry.key != key {
            return Err(PersistenceError::Corrupt(format!(
                "{} holds key `{}`",
                path.display(),
                entry.key
            )));
        }
        Ok(Some(entry.value))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.entry_path(key)?;
        let entry = StoredEntry {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: Utc::now(),
        };
        let data = serde_json::to_string_pretty(&entry)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &data)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.entry_path(key)?) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn quarantine(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let timestamp = Utc::now().format(QUARANTINE_TIMESTAMP_FORMAT);
        let file_name = format!("{}_corrupt_{}.{}", key, timestamp, ENTRY_EXTENSION);
        fs::rename(&path, self.dir.join(&file_name))?;
        tracing::warn!(key, file = %file_name, "quarantined corrupt store entry");
        Ok(Some(file_name))
    }
}

/// Keys become file names, so anything that could escape the store is refused.
fn checked_key(key: &str) -> Result<&str, PersistenceError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(key)
    } else {
        Err(PersistenceError::Unavailable(format!("invalid store key `{key}`")))
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn tmp_path_appends_suffix() {
        let path = Path::new("/data/store/items.json");
        assert_eq!(tmp_path(path), PathBuf::from("/data/store/items.json.tmp"));
    }

    #[test]
    fn path_like_keys_are_refused() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::open(dir.path()).expect("open store");
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
        assert!(store.entry_path("savingPercentage").is_ok());
    }
}
