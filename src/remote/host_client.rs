//! Controller-side proxy for one host

use std::path::PathBuf;

use super::RemoteExecutor;
use super::protocol::{AgentRequest, AgentResponse};
use crate::bootstrap::RuntimeProvisioner;
use crate::client::PackageClient;
use crate::domain::{AppShortcutInfo, Login, SubscriptionReport, TargetHost};
use crate::error::{Result, SyncError, remote};
use crate::shortcut::ShortcutInspector;

/// Collaborator traits for one host, served by its agent
pub struct HostClient<'a> {
    executor: &'a dyn RemoteExecutor,
    host: TargetHost,
}

impl<'a> HostClient<'a> {
    pub fn new(executor: &'a dyn RemoteExecutor, host: TargetHost) -> Self {
        Self { executor, host }
    }

    fn call(&self, request: AgentRequest) -> Result<AgentResponse> {
        match self.executor.execute(&self.host, &request)? {
            AgentResponse::Failed { error } => Err(error.into_error(&self.host)),
            response => Ok(response),
        }
    }

    fn unexpected(&self, op: &str, response: &AgentResponse) -> SyncError {
        remote::protocol(format!(
            "{}: unexpected response to {op}: {response:?}",
            self.host
        ))
    }

    fn expect_done(&self, request: AgentRequest) -> Result<()> {
        let op = request.op();
        match self.call(request)? {
            AgentResponse::Done => Ok(()),
            other => Err(self.unexpected(op, &other)),
        }
    }

    fn expect_report(&self, request: AgentRequest) -> Result<SubscriptionReport> {
        let op = request.op();
        match self.call(request)? {
            AgentResponse::Report { report } => Ok(report),
            other => Err(self.unexpected(op, &other)),
        }
    }
}

impl RuntimeProvisioner for HostClient<'_> {
    fn ensure_runtime(&self) -> Result<PathBuf> {
        match self.call(AgentRequest::EnsureRuntime)? {
            AgentResponse::Runtime { path } => Ok(path),
            other => Err(self.unexpected("ensure_runtime", &other)),
        }
    }
}

impl PackageClient for HostClient<'_> {
    fn current_identity(&self) -> Result<Option<String>> {
        match self.call(AgentRequest::CurrentIdentity)? {
            AgentResponse::Identity { identity } => Ok(identity),
            other => Err(self.unexpected("current_identity", &other)),
        }
    }

    fn login(&self, login: &Login) -> Result<()> {
        self.expect_done(AgentRequest::Login {
            login: login.clone(),
        })
    }

    fn subscribe(&self, name: &str) -> Result<SubscriptionReport> {
        self.expect_report(AgentRequest::Subscribe {
            name: name.to_string(),
        })
    }

    fn unsubscribe(&self, name: &str) -> Result<SubscriptionReport> {
        self.expect_report(AgentRequest::Unsubscribe {
            name: name.to_string(),
        })
    }

    fn cache_warm(&self, name: &str) -> Result<()> {
        self.expect_done(AgentRequest::CacheWarm {
            name: name.to_string(),
        })
    }
}

impl ShortcutInspector for HostClient<'_> {
    fn resolve(&self, app_name: &str) -> Result<AppShortcutInfo> {
        match self.call(AgentRequest::ResolveShortcut {
            name: app_name.to_string(),
        })? {
            AgentResponse::Shortcut { info } => Ok(info),
            other => Err(self.unexpected("resolve_shortcut", &other)),
        }
    }
}
