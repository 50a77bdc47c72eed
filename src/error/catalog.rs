//! Catalog errors

use super::SyncError;

/// Creates a catalog operation failed error
pub fn operation_failed(message: impl Into<String>) -> SyncError {
    SyncError::CatalogOperationFailed {
        message: message.into(),
    }
}

/// Creates a publish failed error for one application
pub fn publish_failed(name: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::PublishFailed {
        name: name.into(),
        reason: reason.into(),
    }
}

/// Creates a group discovery failed error
pub fn group_discovery_failed(group: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::GroupDiscoveryFailed {
        group: group.into(),
        reason: reason.into(),
    }
}

/// Creates a shortcut resolution error
pub fn shortcut_failed(name: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::ShortcutResolveFailed {
        name: name.into(),
        reason: reason.into(),
    }
}
