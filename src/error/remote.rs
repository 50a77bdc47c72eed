//! Process and remote execution errors

use super::SyncError;

/// Creates a command failed error
pub fn command_failed(program: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::CommandFailed {
        program: program.into(),
        reason: reason.into(),
    }
}

/// Creates a remote execution failed error
pub fn execution_failed(host: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::RemoteExecutionFailed {
        host: host.into(),
        reason: reason.into(),
    }
}

/// Creates an agent protocol error
pub fn protocol(reason: impl Into<String>) -> SyncError {
    SyncError::ProtocolError {
        reason: reason.into(),
    }
}
