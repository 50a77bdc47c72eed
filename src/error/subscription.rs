//! Subscription and package client errors

use super::SyncError;

/// Creates a subscription failed error carrying the reported error messages
pub fn failed(name: impl Into<String>, messages: Vec<String>) -> SyncError {
    SyncError::SubscriptionFailed {
        name: name.into(),
        messages,
    }
}

/// Creates a cache warm failed error
pub fn cache_warm_failed(name: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::CacheWarmFailed {
        name: name.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid client output error
pub fn bad_output(reason: impl Into<String>) -> SyncError {
    SyncError::ClientOutputInvalid {
        reason: reason.into(),
    }
}
