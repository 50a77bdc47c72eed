//! Session and login errors

use super::SyncError;

/// Creates a login rejected error
pub fn login_rejected(identity: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::LoginRejected {
        identity: identity.into(),
        reason: reason.into(),
    }
}
