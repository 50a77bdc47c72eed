//! Published-application catalog
//!
//! The catalog is the shared list of applications each delivery group
//! offers to its users. It is reached through [`CatalogClient`]; the
//! backends here are a JSON file for standalone installs and an external
//! command bridging to a broker's management tooling.

mod command;
mod file;
mod lock;
#[cfg(test)]
mod memory;

pub use command::CommandCatalog;
pub use file::FileCatalog;
pub use lock::ScopeLocker;
#[cfg(test)]
pub use memory::MemoryCatalog;

use std::time::Duration;

use crate::config::{CatalogBackend, CatalogConfig};
use crate::domain::{CatalogEntry, NewCatalogEntry, TargetHost};
use crate::error::Result;

/// Operations of the published-application catalog
pub trait CatalogClient {
    /// Entry with `canonical_name` in `group`, if any
    fn find(&self, canonical_name: &str, group: &str) -> Result<Option<CatalogEntry>>;

    /// Create an entry; the catalog assigns the icon handle
    fn create(&self, entry: &NewCatalogEntry) -> Result<CatalogEntry>;

    fn delete(&self, entry: &CatalogEntry) -> Result<()>;

    /// Member hosts of a delivery group, in catalog order
    fn list_group_members(&self, group: &str) -> Result<Vec<TargetHost>>;

    /// All entries, optionally restricted to one group
    fn list(&self, group: Option<&str>) -> Result<Vec<CatalogEntry>>;
}

/// Open the configured catalog backend
pub fn open(config: &CatalogConfig, timeout: Duration) -> Box<dyn CatalogClient> {
    match &config.backend {
        CatalogBackend::File { path } => {
            tracing::debug!(path = %path.display(), "using file catalog");
            Box::new(FileCatalog::new(path.clone()))
        }
        CatalogBackend::Command { program, args } => {
            tracing::debug!(program = %program, "using command catalog");
            Box::new(CommandCatalog::new(program.clone(), args.clone(), timeout))
        }
    }
}
