use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::StateStore;

const FILE_FORMAT_VERSION: u32 = 1;

/// On-disk snapshot: every key with its value hex-encoded.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

/// File-backed state store.
///
/// The whole key space is kept in memory and the snapshot file is rewritten
/// on every put through a temporary file renamed over the original, so a
/// crash mid-write leaves the previous snapshot intact. A put whose flush
/// fails is rolled back in memory as well.
pub struct FileStateStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl FileStateStore {
    /// Open the snapshot at `path`, starting empty if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read(&path) {
            Ok(raw) => Self::parse(&path, &raw)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = values.len(), "state file opened");
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().expect("lock poisoned").is_empty()
    }

    /// All keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.values
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    fn parse(path: &Path, raw: &[u8]) -> StoreResult<BTreeMap<String, Vec<u8>>> {
        let corrupt = |reason: String| StoreError::CorruptFile {
            path: path.to_path_buf(),
            reason,
        };
        let file: StateFile = serde_json::from_slice(raw).map_err(|e| corrupt(e.to_string()))?;
        if file.version != FILE_FORMAT_VERSION {
            return Err(corrupt(format!("unsupported version {}", file.version)));
        }
        file.entries
            .into_iter()
            .map(|(key, value)| {
                hex::decode(&value)
                    .map(|bytes| (key.clone(), bytes))
                    .map_err(|e| corrupt(format!("key {key}: {e}")))
            })
            .collect()
    }

    fn flush(&self, values: &BTreeMap<String, Vec<u8>>) -> StoreResult<()> {
        let file = StateFile {
            version: FILE_FORMAT_VERSION,
            entries: values
                .iter()
                .map(|(k, v)| (k.clone(), hex::encode(v)))
                .collect(),
        };
        let json = serde_json::to_vec_pretty(&file)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.values.read().expect("lock poisoned").get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut values = self.values.write().expect("lock poisoned");
        let previous = values.insert(key.to_string(), value.to_vec());
        if let Err(e) = self.flush(&values) {
            match previous {
                Some(old) => values.insert(key.to_string(), old),
                None => values.remove(key),
            };
            return Err(e);
        }
        debug!(key, len = value.len(), "state persisted");
        Ok(())
    }
}

impl std::fmt::Debug for FileStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStateStore")
            .field("path", &self.path)
            .field("key_count", &self.len())
            .finish()
    }
}
