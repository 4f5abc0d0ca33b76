//! Exercise catalog: normalized name → canonical exercise metadata.
//!
//! The catalog is loaded once from a JSON document, mutated only through
//! [`Catalog::add`], and written back atomically after every mutation.
//!
//! ```json
//! {
//!   "_comment": "free-form top-level fields are preserved",
//!   "exercises": {
//!     "pull ups": { "canonical_name": "PULL_UP", "category": "PULL_UP", "muscles": ["lats"] }
//!   }
//! }
//! ```

use crate::normalize::{fold_separators, normalize};
use crate::{CatalogEntry, Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// On-disk layout. Entries stay as raw JSON until validated one by one so a
/// single bad entry doesn't take the whole catalog down.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    exercises: BTreeMap<String, Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// In-memory exercise catalog, optionally bound to a file
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: HashMap<String, CatalogEntry>,
    /// separator-folded key → lexicographically first catalog key
    folded: HashMap<String, String>,
    path: Option<PathBuf>,
    /// Top-level document fields other than `exercises`
    extra: Map<String, Value>,
    /// Entries that failed to deserialize; written back untouched
    unparsed: BTreeMap<String, Value>,
    /// The file existed but could not be parsed; keep a copy before overwriting
    backup_on_save: bool,
}

impl Catalog {
    /// Empty catalog that lives only in memory
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory catalog built from `(name, entry)` pairs.
    ///
    /// Names are normalized; names that normalize to nothing are skipped.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, CatalogEntry)>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();
        for (name, entry) in entries {
            let key = normalize(name.as_ref());
            if key.is_empty() {
                tracing::warn!("Skipping catalog entry with empty name");
                continue;
            }
            catalog.insert(key, entry);
        }
        catalog
    }

    /// Load the catalog stored at `path`.
    ///
    /// A missing or corrupt file is never fatal: it is logged and the catalog
    /// starts empty, still bound to `path` so later additions are persisted.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut catalog = Self {
            path: Some(path.clone()),
            ..Self::default()
        };

        if !path.exists() {
            tracing::warn!("No exercise catalog found at {:?}, starting empty", path);
            return catalog;
        }

        catalog.load(&path);
        tracing::info!("Loaded {} exercises from {:?}", catalog.len(), path);
        catalog
    }

    /// Replace the in-memory state with the document at `path`
    fn load(&mut self, path: &Path) {
        self.entries.clear();
        self.folded.clear();
        self.extra.clear();
        self.unparsed.clear();
        self.backup_on_save = false;

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(
                    "Failed to read exercise catalog {:?}: {}. Starting empty.",
                    path,
                    e
                );
                return;
            }
        };

        let document = match serde_json::from_str::<CatalogDocument>(&contents) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(
                    "Failed to parse exercise catalog {:?}: {}. Starting empty.",
                    path,
                    e
                );
                self.backup_on_save = true;
                return;
            }
        };

        self.extra = document.extra;

        // Keys already in normalized form claim their slot first, so every
        // losing duplicate keeps a raw key that no entry is saved under.
        let mut stored: Vec<(String, String, Value)> = document
            .exercises
            .into_iter()
            .map(|(raw_key, value)| (normalize(&raw_key), raw_key, value))
            .collect();
        stored.sort_by(|a, b| {
            (a.0 != a.1)
                .cmp(&(b.0 != b.1))
                .then_with(|| a.1.cmp(&b.1))
        });

        for (key, raw_key, value) in stored {
            if key.is_empty() {
                tracing::warn!("Dropping catalog entry {:?}: name normalizes to nothing", raw_key);
                continue;
            }

            let entry = match serde_json::from_value::<CatalogEntry>(value.clone()) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Ignoring malformed catalog entry {:?}: {}", raw_key, e);
                    self.unparsed.insert(raw_key, value);
                    continue;
                }
            };

            if self.entries.contains_key(&key) {
                tracing::warn!(
                    "Duplicate catalog key {:?} (from {:?}), keeping it on disk only",
                    key,
                    raw_key
                );
                self.unparsed.insert(raw_key, value);
                continue;
            }
            if key != raw_key {
                tracing::debug!("Normalized catalog key {:?} -> {:?}", raw_key, key);
            }
            self.insert(key, entry);
        }
    }

    /// File this catalog persists to, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup by normalized key
    pub fn lookup(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    /// Lookup that treats hyphens and spaces as the same separator.
    ///
    /// Returns the matching catalog key alongside the entry.
    pub fn lookup_folded(&self, key: &str) -> Option<(&str, &CatalogEntry)> {
        let catalog_key = self.folded.get(&fold_separators(key))?;
        self.entries
            .get_key_value(catalog_key)
            .map(|(k, entry)| (k.as_str(), entry))
    }

    /// Sorted snapshot of every key
    pub fn all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Entries ordered by key
    pub fn entries(&self) -> Vec<(&str, &CatalogEntry)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.as_str(), entry))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Add or overwrite the mapping for `name` and persist the catalog.
    ///
    /// Returns the normalized key. If the write fails the in-memory catalog
    /// is rolled back and the error is returned.
    pub fn add(
        &mut self,
        name: &str,
        canonical_name: impl Into<String>,
        category: impl Into<String>,
        muscles: Vec<String>,
    ) -> Result<String> {
        let key = normalize(name);
        if key.is_empty() {
            return Err(Error::CatalogValidation(format!(
                "exercise name {:?} is empty after normalization",
                name
            )));
        }

        let entry = CatalogEntry {
            canonical_name: canonical_name.into(),
            category: category.into(),
            muscles,
        };
        if entry.canonical_name.trim().is_empty() {
            return Err(Error::CatalogValidation(format!(
                "mapping for {:?} has an empty canonical name",
                key
            )));
        }

        // Held until the write lands; other processes wait here and then
        // reload, so no update is lost
        let _lock = self.lock_for_update()?;
        if let Some(path) = self.path.clone() {
            if path.exists() {
                self.load(&path);
            }
        }

        let previous = self.insert(key.clone(), entry);

        if let Err(e) = self.save() {
            match previous {
                Some(old) => {
                    self.entries.insert(key.clone(), old);
                }
                None => {
                    self.entries.remove(&key);
                    self.rebuild_folded();
                }
            }
            tracing::error!("Failed to persist mapping for {:?}: {}", key, e);
            return Err(e);
        }

        tracing::info!("Added catalog mapping {:?}", key);
        Ok(key)
    }

    /// Write the catalog to its file.
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    ///
    /// In-memory catalogs have nothing to write and succeed immediately.
    pub fn save(&mut self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            tracing::debug!("Catalog has no backing file, skipping save");
            return Ok(());
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        if self.backup_on_save && path.exists() {
            let backup = path.with_extension("json.corrupt");
            std::fs::copy(&path, &backup)?;
            tracing::warn!("Kept unreadable catalog as {:?}", backup);
            self.backup_on_save = false;
        }

        let mut exercises = self.unparsed.clone();
        for (key, entry) in &self.entries {
            exercises.insert(key.clone(), serde_json::to_value(entry)?);
        }
        let document = CatalogDocument {
            exercises,
            extra: self.extra.clone(),
        };

        let temp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(&document)?;
            writer.write_all(contents.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} exercises to {:?}", self.len(), path);
        Ok(())
    }

    /// Consistency check of the in-memory mapping
    ///
    /// Returns a list of problems, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (key, entry) in &self.entries {
            if key.is_empty() {
                errors.push("Catalog has an empty key".to_string());
            }
            if normalize(key) != *key {
                errors.push(format!("Catalog key '{}' is not normalized", key));
            }
            if entry.canonical_name.is_empty() {
                errors.push(format!("Exercise '{}' has empty canonical name", key));
            }
            if entry.category.is_empty() {
                errors.push(format!("Exercise '{}' has empty category", key));
            }
        }

        errors.sort();
        errors
    }

    fn insert(&mut self, key: String, entry: CatalogEntry) -> Option<CatalogEntry> {
        let folded = fold_separators(&key);
        let replace = match self.folded.get(&folded) {
            Some(existing) => key < *existing,
            None => true,
        };
        if replace {
            self.folded.insert(folded, key.clone());
        }
        self.entries.insert(key, entry)
    }

    fn rebuild_folded(&mut self) {
        self.folded.clear();
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        for key in keys {
            self.folded
                .entry(fold_separators(key))
                .or_insert_with(|| key.clone());
        }
    }

    /// Exclusive lock on `<catalog>.lock`, or `None` for in-memory catalogs.
    ///
    /// The lock lives on a sibling file because saves replace the catalog
    /// file itself by rename.
    fn lock_for_update(&self) -> Result<Option<File>> {
        let Some(path) = self.path.as_deref() else {
            return Ok(None);
        };

        let lock_path = lock_path(path);
        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        file.lock_exclusive()?;
        tracing::debug!("Acquired catalog lock {:?}", lock_path);
        Ok(Some(file))
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}
