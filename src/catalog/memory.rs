//! In-memory catalog with failure injection

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::CatalogClient;
use crate::domain::{CatalogEntry, NewCatalogEntry, TargetHost};
use crate::error::{Result, catalog};

#[derive(Default)]
pub struct MemoryCatalog {
    entries: RefCell<Vec<CatalogEntry>>,
    groups: HashMap<String, Vec<TargetHost>>,
    failing_creates: HashSet<String>,
    failing_deletes: HashSet<String>,
    discovery_error: Option<String>,
    /// Mutating calls in order, e.g. `create Word@Office`
    pub mutations: RefCell<Vec<String>>,
    /// Every call in order, reads included
    pub calls: RefCell<Vec<String>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: &str, hosts: &[&str]) -> Self {
        self.groups.insert(
            group.to_string(),
            hosts.iter().map(|h| TargetHost::new(*h)).collect(),
        );
        self
    }

    /// Pre-existing entry for a shortcut named `name`
    pub fn with_entry(self, name: &str, group: &str) -> Self {
        let request = NewCatalogEntry::from_shortcut(&crate::test_fixtures::shortcut(name), group);
        self.entries.borrow_mut().push(materialize(&request));
        self
    }

    /// Make `create` fail for this canonical name
    pub fn failing_create(mut self, canonical_name: &str) -> Self {
        self.failing_creates.insert(canonical_name.to_string());
        self
    }

    pub fn failing_delete(mut self, canonical_name: &str) -> Self {
        self.failing_deletes.insert(canonical_name.to_string());
        self
    }

    pub fn failing_discovery(mut self, reason: &str) -> Self {
        self.discovery_error = Some(reason.to_string());
        self
    }

    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.entries.borrow().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.borrow().len()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

fn materialize(request: &NewCatalogEntry) -> CatalogEntry {
    CatalogEntry {
        canonical_name: request.canonical_name.clone(),
        display_name: request.display_name.clone(),
        command_line: request.command_line.clone(),
        icon_handle: format!("icon-{}", request.canonical_name),
        group: request.group.clone(),
    }
}

impl CatalogClient for MemoryCatalog {
    fn find(&self, canonical_name: &str, group: &str) -> Result<Option<CatalogEntry>> {
        self.record(format!("find {canonical_name}@{group}"));
        Ok(self
            .entries
            .borrow()
            .iter()
            .find(|e| e.canonical_name == canonical_name && e.group == group)
            .cloned())
    }

    fn create(&self, entry: &NewCatalogEntry) -> Result<CatalogEntry> {
        self.record(format!("create {}@{}", entry.canonical_name, entry.group));
        if self.failing_creates.contains(&entry.canonical_name) {
            return Err(catalog::operation_failed("broker refused the entry"));
        }
        let created = materialize(entry);
        self.entries.borrow_mut().push(created.clone());
        self.mutations
            .borrow_mut()
            .push(format!("create {}@{}", entry.canonical_name, entry.group));
        Ok(created)
    }

    fn delete(&self, entry: &CatalogEntry) -> Result<()> {
        self.record(format!("delete {}@{}", entry.canonical_name, entry.group));
        if self.failing_deletes.contains(&entry.canonical_name) {
            return Err(catalog::operation_failed("entry is locked"));
        }
        self.entries
            .borrow_mut()
            .retain(|e| !(e.canonical_name == entry.canonical_name && e.group == entry.group));
        self.mutations
            .borrow_mut()
            .push(format!("delete {}@{}", entry.canonical_name, entry.group));
        Ok(())
    }

    fn list_group_members(&self, group: &str) -> Result<Vec<TargetHost>> {
        self.record(format!("members {group}"));
        if let Some(reason) = &self.discovery_error {
            return Err(catalog::operation_failed(reason.clone()));
        }
        Ok(self.groups.get(group).cloned().unwrap_or_default())
    }

    fn list(&self, group: Option<&str>) -> Result<Vec<CatalogEntry>> {
        Ok(self
            .entries
            .borrow()
            .iter()
            .filter(|e| group.is_none_or(|g| e.group == g))
            .cloned()
            .collect())
    }
}
