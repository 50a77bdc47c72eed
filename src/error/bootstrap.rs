//! Runtime bootstrap errors

use super::SyncError;

/// Creates a download failed error
pub fn download_failed(url: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::DownloadFailed {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates an install failed error
pub fn install_failed(reason: impl Into<String>) -> SyncError {
    SyncError::InstallFailed {
        reason: reason.into(),
    }
}
