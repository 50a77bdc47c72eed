//! Shortcut metadata of installed applications

use serde::{Deserialize, Serialize};

/// Icon resource inside a file (e.g. an executable with several icons)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSource {
    pub path: String,
    #[serde(default)]
    pub index: i32,
}

/// How an installed application is launched, as read from its shortcut
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppShortcutInfo {
    /// Raw shortcut name; may contain characters illegal in catalog names
    pub name: String,
    pub target_path: String,
    #[serde(default)]
    pub arguments: String,
    pub icon: IconSource,
}
