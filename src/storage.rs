//! Persistence of the record set as a single JSON blob in a key-value backend.
//!
//! The `Backend` trait is the key-value collaborator. `Persistence` sits on top of it and knows
//! about records: it serializes the full set under one fixed key and degrades to an empty set when
//! the stored blob is missing or corrupt.

use crate::model::Record;
use crate::{fs, Error};
use anyhow::Context;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The key under which the record set is stored.
pub const RECORDS_KEY: &str = "transactions";

/// A string key-value store.
pub trait Backend {
    /// Returns the value stored under `key`, or `None` if nothing has been stored.
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Stores `value` under `key`, replacing any prior value.
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// An in-process backend.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    values: BTreeMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let _ = self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A backend that keeps each key in its own `{key}.json` file inside a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Creates the directory if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Backend for FileBackend {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path(key);
        if !path.is_file() {
            return Ok(None);
        }
        fs::read_to_string(&path).map(Some)
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write_all(&tmp, value.bytes())?;
        fs::rename(&tmp, &path)
    }
}

/// Loads and saves the record set through a `Backend`.
#[derive(Debug, Clone)]
pub struct Persistence<B> {
    backend: B,
    key: String,
}

impl<B: Backend> Persistence<B> {
    /// Uses the default `RECORDS_KEY`.
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, RECORDS_KEY)
    }

    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Loads the stored records. This never fails: a missing blob gives an empty set, and an
    /// unreadable or unparsable blob is logged and also gives an empty set. When two records share
    /// an id, only the first is kept.
    pub fn load(&self) -> Vec<Record> {
        let text = match self.backend.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!("Nothing stored under '{}', starting empty", self.key);
                return Vec::new();
            }
            Err(e) => {
                warn!("Unable to read stored records, starting empty: {e:#}");
                return Vec::new();
            }
        };

        let records: Vec<Record> = match serde_json::from_str(&text) {
            Ok(records) => records,
            Err(e) => {
                warn!("Stored records under '{}' are corrupt, starting empty: {e}", self.key);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let total = records.len();
        let records: Vec<Record> = records
            .into_iter()
            .filter(|r| seen.insert(r.id()))
            .collect();
        if records.len() < total {
            warn!(
                "Dropped {} stored record(s) with duplicate ids",
                total - records.len()
            );
        }
        debug!("Loaded {} records", records.len());
        records
    }

    /// Serializes the full record set and stores it, replacing the previous value.
    pub fn save(&mut self, records: &[Record]) -> crate::Result<()> {
        let json = serde_json::to_string(records)
            .context("Unable to serialize records")
            .map_err(Error::Persistence)?;
        self.backend
            .set(&self.key, &json)
            .with_context(|| format!("Unable to store records under '{}'", self.key))
            .map_err(Error::Persistence)?;
        debug!("Saved {} records", records.len());
        Ok(())
    }
}
