//! Catalog kept in a JSON document on disk
//!
//! ```json
//! {
//!   "entries": [{ "canonicalName": "...", "group": "...", ... }],
//!   "groups": { "Office Apps": ["host01", "host02"] }
//! }
//! ```
//!
//! Groups are maintained by hand; entries are maintained by channelsync.
//! Every access holds an advisory lock next to the document and every
//! write replaces the file atomically.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use fslock::LockFile;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::CatalogClient;
use crate::domain::{CatalogEntry, NewCatalogEntry, TargetHost};
use crate::error::{Result, catalog};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    entries: Vec<CatalogEntry>,
    #[serde(default)]
    groups: BTreeMap<String, Vec<TargetHost>>,
}

impl CatalogDocument {
    fn position(&self, canonical_name: &str, group: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.canonical_name == canonical_name && e.group == group)
    }
}

/// JSON file backend
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn lock(&self) -> Result<LockFile> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let lock_path = self.lock_path();
        let mut lock = LockFile::open(&lock_path).map_err(|e| {
            catalog::operation_failed(format!("failed to open {}: {e}", lock_path.display()))
        })?;
        lock.lock().map_err(|e| {
            catalog::operation_failed(format!("failed to lock {}: {e}", lock_path.display()))
        })?;
        Ok(lock)
    }

    fn read(&self) -> Result<CatalogDocument> {
        if !self.path.exists() {
            return Ok(CatalogDocument::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(CatalogDocument::default());
        }
        serde_json::from_str(&content).map_err(|e| {
            catalog::operation_failed(format!("{} is not a valid catalog: {e}", self.path.display()))
        })
    }

    fn write(&self, document: &CatalogDocument) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut staged, document)
            .map_err(|e| catalog::operation_failed(e.to_string()))?;
        staged.write_all(b"\n")?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|e| {
            catalog::operation_failed(format!("failed to replace {}: {}", self.path.display(), e.error))
        })?;
        Ok(())
    }

    /// Read the document under the lock
    fn inspect<T>(&self, f: impl FnOnce(&CatalogDocument) -> T) -> Result<T> {
        let mut lock = self.lock()?;
        let result = self.read().map(|doc| f(&doc));
        let _ = lock.unlock();
        result
    }

    /// Read, change and write the document under one lock
    fn update<T>(&self, f: impl FnOnce(&mut CatalogDocument) -> Result<T>) -> Result<T> {
        let mut lock = self.lock()?;
        let result = self.read().and_then(|mut doc| {
            let value = f(&mut doc)?;
            self.write(&doc)?;
            Ok(value)
        });
        let _ = lock.unlock();
        result
    }
}

/// Icon reference in the usual `path,index` resource notation
fn icon_handle(entry: &NewCatalogEntry) -> String {
    format!("{},{}", entry.icon.path, entry.icon.index)
}

impl CatalogClient for FileCatalog {
    fn find(&self, canonical_name: &str, group: &str) -> Result<Option<CatalogEntry>> {
        self.inspect(|doc| {
            doc.position(canonical_name, group)
                .map(|i| doc.entries[i].clone())
        })
    }

    fn create(&self, entry: &NewCatalogEntry) -> Result<CatalogEntry> {
        self.update(|doc| {
            if doc.position(&entry.canonical_name, &entry.group).is_some() {
                return Err(catalog::operation_failed(format!(
                    "an entry named '{}' already exists in '{}'",
                    entry.canonical_name, entry.group
                )));
            }
            let created = CatalogEntry {
                canonical_name: entry.canonical_name.clone(),
                display_name: entry.display_name.clone(),
                command_line: entry.command_line.clone(),
                icon_handle: icon_handle(entry),
                group: entry.group.clone(),
            };
            doc.entries.push(created.clone());
            Ok(created)
        })
    }

    fn delete(&self, entry: &CatalogEntry) -> Result<()> {
        self.update(|doc| match doc.position(&entry.canonical_name, &entry.group) {
            Some(i) => {
                doc.entries.remove(i);
                Ok(())
            }
            None => Err(catalog::operation_failed(format!(
                "no entry named '{}' in '{}'",
                entry.canonical_name, entry.group
            ))),
        })
    }

    fn list_group_members(&self, group: &str) -> Result<Vec<TargetHost>> {
        self.inspect(|doc| doc.groups.get(group).cloned().unwrap_or_default())
    }

    fn list(&self, group: Option<&str>) -> Result<Vec<CatalogEntry>> {
        self.inspect(|doc| {
            doc.entries
                .iter()
                .filter(|e| group.is_none_or(|g| e.group == g))
                .cloned()
                .collect()
        })
    }
}
