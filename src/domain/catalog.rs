//! Published-application catalog records
//!
//! Catalog names are derived from raw shortcut names by [`canonical_name`].
//! Within one delivery group a canonical name identifies at most one entry.

use serde::{Deserialize, Serialize};

use super::shortcut::{AppShortcutInfo, IconSource};

/// Characters the catalog naming scheme does not accept
pub const ILLEGAL_NAME_CHARS: &[char] = &[
    '\\', '/', ';', ':', '#', '.', '*', '?', '=', '<', '>', '[', ']', '(', ')',
];

/// Derive the catalog name of an application by stripping illegal characters
///
/// Nothing else is changed: no trimming, no case folding.
pub fn canonical_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| !ILLEGAL_NAME_CHARS.contains(c))
        .collect()
}

/// Executable plus arguments of a published application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLine {
    pub executable: String,
    #[serde(default)]
    pub arguments: String,
}

/// A published-application record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub canonical_name: String,
    /// Name shown to end users (the raw shortcut name)
    pub display_name: String,
    pub command_line: CommandLine,
    pub icon_handle: String,
    /// Delivery group the entry is published to
    pub group: String,
}

/// Request to create a catalog entry; the catalog assigns the icon handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCatalogEntry {
    pub canonical_name: String,
    pub display_name: String,
    pub command_line: CommandLine,
    pub icon: IconSource,
    pub group: String,
}

impl NewCatalogEntry {
    /// Build the creation request for a resolved shortcut
    pub fn from_shortcut(info: &AppShortcutInfo, group: &str) -> Self {
        Self {
            canonical_name: canonical_name(&info.name),
            display_name: info.name.clone(),
            command_line: CommandLine {
                executable: info.target_path.clone(),
                arguments: info.arguments.clone(),
            },
            icon: info.icon.clone(),
            group: group.to_string(),
        }
    }
}
