//! Per-delivery-group mutual exclusion
//!
//! The catalog has no transactions, so "find, then create" is only safe
//! while nobody else touches the same group. Holders in this process are
//! tracked in a registry; with a lock directory configured an advisory
//! lock file per group extends the exclusion to other processes.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Condvar, Mutex, PoisonError};

use fslock::LockFile;

use crate::error::{Result, catalog};

/// Hands out exclusive guards per scope name
#[derive(Debug, Default)]
pub struct ScopeLocker {
    held: Mutex<HashSet<String>>,
    released: Condvar,
    lock_dir: Option<PathBuf>,
}

/// Exclusive hold on one scope; released on drop
pub struct ScopeGuard<'a> {
    locker: &'a ScopeLocker,
    scope: String,
    file: Option<LockFile>,
}

impl ScopeLocker {
    pub fn new(lock_dir: Option<PathBuf>) -> Self {
        Self {
            lock_dir,
            ..Self::default()
        }
    }

    /// Block until `scope` is free, then take it
    pub fn lock(&self, scope: &str) -> Result<ScopeGuard<'_>> {
        {
            let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
            while held.contains(scope) {
                held = self
                    .released
                    .wait(held)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            held.insert(scope.to_string());
        }

        let mut guard = ScopeGuard {
            locker: self,
            scope: scope.to_string(),
            file: None,
        };
        if let Some(dir) = &self.lock_dir {
            // On failure the guard drops and frees the in-process slot
            guard.file = Some(lock_file(dir, scope)?);
        }
        tracing::debug!(scope = %scope, "scope locked");
        Ok(guard)
    }

    fn release(&self, scope: &str) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.remove(scope);
        self.released.notify_all();
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.unlock();
        }
        self.locker.release(&self.scope);
        tracing::debug!(scope = %self.scope, "scope released");
    }
}

fn lock_file(dir: &Path, scope: &str) -> Result<LockFile> {
    fs::create_dir_all(dir)?;
    let path = dir.join(lock_file_name(scope));
    let mut file = LockFile::open(&path).map_err(|e| {
        catalog::operation_failed(format!("failed to open lock file {}: {e}", path.display()))
    })?;
    file.lock().map_err(|e| {
        catalog::operation_failed(format!("failed to lock {}: {e}", path.display()))
    })?;
    Ok(file)
}

/// File name for a scope; distinct scopes may share a file, which only over-locks
fn lock_file_name(scope: &str) -> String {
    let stem: String = scope
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("group-{stem}.lock")
}
