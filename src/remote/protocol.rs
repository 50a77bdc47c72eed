//! Agent request and response messages
//!
//! One JSON request goes in, one JSON response comes out. Failures travel
//! as [`AgentError`] with the error's diagnostic code so the controller can
//! rebuild the same typed error on its side.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::{AppShortcutInfo, Login, SubscriptionReport, TargetHost};
use crate::error::{SyncError, remote};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AgentRequest {
    EnsureRuntime,
    CurrentIdentity,
    Login { login: Login },
    Subscribe { name: String },
    Unsubscribe { name: String },
    CacheWarm { name: String },
    ResolveShortcut { name: String },
}

impl AgentRequest {
    /// Operation name for logs; never includes credentials
    pub fn op(&self) -> &'static str {
        match self {
            AgentRequest::EnsureRuntime => "ensure_runtime",
            AgentRequest::CurrentIdentity => "current_identity",
            AgentRequest::Login { .. } => "login",
            AgentRequest::Subscribe { .. } => "subscribe",
            AgentRequest::Unsubscribe { .. } => "unsubscribe",
            AgentRequest::CacheWarm { .. } => "cache_warm",
            AgentRequest::ResolveShortcut { .. } => "resolve_shortcut",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AgentResponse {
    Runtime { path: PathBuf },
    Identity { identity: Option<String> },
    Done,
    Report { report: SubscriptionReport },
    Shortcut { info: AppShortcutInfo },
    Failed { error: AgentError },
}

/// A host-side failure in transferable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentError {
    /// Diagnostic code, e.g. `channelsync::session::rejected`
    pub code: String,
    pub message: String,
    /// Identity, application name or URL the error is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl AgentError {
    pub fn from_error(err: &SyncError) -> Self {
        let (subject, message) = match err {
            SyncError::LoginRejected { identity, reason } => (Some(identity.clone()), reason.clone()),
            SyncError::DownloadFailed { url, reason } => (Some(url.clone()), reason.clone()),
            SyncError::CacheWarmFailed { name, reason }
            | SyncError::ShortcutResolveFailed { name, reason } => (Some(name.clone()), reason.clone()),
            SyncError::InstallFailed { reason } | SyncError::ClientOutputInvalid { reason } => {
                (None, reason.clone())
            }
            other => (None, other.to_string()),
        };
        Self {
            code: err.code_str(),
            message,
            subject,
        }
    }

    /// Rebuild the typed error; unknown codes become a remote execution failure
    pub fn into_error(self, host: &TargetHost) -> SyncError {
        let subject = self.subject.unwrap_or_default();
        let reason = self.message;
        match self.code.as_str() {
            "channelsync::session::rejected" => SyncError::LoginRejected {
                identity: subject,
                reason,
            },
            "channelsync::bootstrap::download_failed" => SyncError::DownloadFailed {
                url: subject,
                reason,
            },
            "channelsync::bootstrap::install_failed" => SyncError::InstallFailed { reason },
            "channelsync::subscription::cache_warm_failed" => SyncError::CacheWarmFailed {
                name: subject,
                reason,
            },
            "channelsync::subscription::bad_output" => SyncError::ClientOutputInvalid { reason },
            "channelsync::catalog::shortcut_failed" => SyncError::ShortcutResolveFailed {
                name: subject,
                reason,
            },
            _ => remote::execution_failed(host.name.clone(), reason),
        }
    }
}
