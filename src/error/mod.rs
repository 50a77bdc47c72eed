//! Error types and handling for channelsync
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`bootstrap`]: Runtime download and install errors
//! - [`session`]: Login and credential errors
//! - [`subscription`]: Package client and subscription errors
//! - [`catalog`]: Published-application catalog errors
//! - [`remote`]: Process and remote execution errors
//! - [`config`]: Configuration errors

pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod remote;
pub mod session;
pub mod subscription;


use miette::Diagnostic;
use thiserror::Error;

/// Main error type for channelsync operations
#[derive(Error, Diagnostic, Debug)]
pub enum SyncError {
    // Bootstrap errors
    #[error("Failed to download client installer from {url}: {reason}")]
    #[diagnostic(
        code(channelsync::bootstrap::download_failed),
        help("Check that bootstrap.download_url is reachable from the host")
    )]
    DownloadFailed { url: String, reason: String },

    #[error("Client install failed: {reason}")]
    #[diagnostic(code(channelsync::bootstrap::install_failed))]
    InstallFailed { reason: String },

    // Session errors
    #[error("The API key was rejected")]
    #[diagnostic(
        code(channelsync::session::invalid_api_key),
        help("API key logins are never retried. Check the key and run again")
    )]
    InvalidApiKey,

    #[error("Login cancelled")]
    #[diagnostic(code(channelsync::session::cancelled))]
    LoginCancelled,

    #[error("Login rejected for '{identity}': {reason}")]
    #[diagnostic(code(channelsync::session::rejected))]
    LoginRejected { identity: String, reason: String },

    #[error("Login failed after {attempts} attempt(s)")]
    #[diagnostic(
        code(channelsync::session::attempts_exhausted),
        help("Raise auth.max_attempts or remove it to retry until cancelled")
    )]
    LoginAttemptsExhausted { attempts: u32 },

    // Subscription errors
    #[error("Subscription '{name}' failed: {}", .messages.join("; "))]
    #[diagnostic(code(channelsync::subscription::failed))]
    SubscriptionFailed { name: String, messages: Vec<String> },

    #[error("Cache warm for '{name}' failed: {reason}")]
    #[diagnostic(code(channelsync::subscription::cache_warm_failed))]
    CacheWarmFailed { name: String, reason: String },

    #[error("Unexpected package client output: {reason}")]
    #[diagnostic(code(channelsync::subscription::bad_output))]
    ClientOutputInvalid { reason: String },

    // Catalog errors
    #[error("Failed to publish '{name}': {reason}")]
    #[diagnostic(code(channelsync::catalog::publish_failed))]
    PublishFailed { name: String, reason: String },

    #[error("Failed to discover hosts of delivery group '{group}': {reason}")]
    #[diagnostic(
        code(channelsync::catalog::group_discovery_failed),
        help("Check that the delivery group exists and has member hosts")
    )]
    GroupDiscoveryFailed { group: String, reason: String },

    #[error("Catalog operation failed: {message}")]
    #[diagnostic(code(channelsync::catalog::operation_failed))]
    CatalogOperationFailed { message: String },

    #[error("Failed to resolve shortcut for '{name}': {reason}")]
    #[diagnostic(code(channelsync::catalog::shortcut_failed))]
    ShortcutResolveFailed { name: String, reason: String },

    // Process and remote errors
    #[error("Command '{program}' failed: {reason}")]
    #[diagnostic(code(channelsync::remote::command_failed))]
    CommandFailed { program: String, reason: String },

    #[error("Command '{program}' timed out after {seconds}s")]
    #[diagnostic(
        code(channelsync::remote::timed_out),
        help("Raise the matching value under timeouts: in the configuration")
    )]
    CommandTimedOut { program: String, seconds: u64 },

    #[error("Remote execution on '{host}' failed: {reason}")]
    #[diagnostic(code(channelsync::remote::execution_failed))]
    RemoteExecutionFailed { host: String, reason: String },

    #[error("Invalid agent message: {reason}")]
    #[diagnostic(code(channelsync::remote::protocol))]
    ProtocolError { reason: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(channelsync::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(channelsync::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(channelsync::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(channelsync::fs::io_error))]
    IoError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SyncError {
    /// Stable diagnostic code of this error, as sent across the agent protocol
    pub fn code_str(&self) -> String {
        self.code().map(|c| c.to_string()).unwrap_or_default()
    }

    /// Whether a failed login may be retried with fresh credentials
    pub fn is_login_rejection(&self) -> bool {
        matches!(self, SyncError::LoginRejected { .. })
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::IoError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for SyncError {
    fn from(err: serde_yaml::Error) -> Self {
        SyncError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::ProtocolError {
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for SyncError {
    fn from(err: inquire::InquireError) -> Self {
        SyncError::IoError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SyncError>;
