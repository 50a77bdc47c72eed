//! Shared test doubles for the host-side collaborators.
//!
//! Every fake records what it was asked so tests can assert on call order
//! and on the exact credentials that reached the package client.
//!
//! ```ignore
//! use crate::test_fixtures::{FakePackageClient, ScriptedPrompt};
//!
//! let client = FakePackageClient::logged_out().rejecting_logins(2);
//! let prompt = ScriptedPrompt::answering(&[("alice", "one"), ("alice", "two")]);
//! ```

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::client::PackageClient;
use crate::domain::{
    AppShortcutInfo, IconSource, Login, Secret, SubscriptionReport, TargetHost,
};
use crate::error::{Result, bootstrap, catalog, remote, session, subscription};
use crate::remote::{AgentError, AgentRequest, AgentResponse, RemoteExecutor};
use crate::session::CredentialPrompt;
use crate::shortcut::ShortcutInspector;

/// How the fake answers one login call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginReply {
    Accept,
    Reject,
    /// Transport failure, not a rejection
    Break,
}

/// Scriptable [`PackageClient`]
#[derive(Default)]
pub struct FakePackageClient {
    identity: RefCell<Option<String>>,
    login_replies: RefCell<VecDeque<LoginReply>>,
    subscribe_report: SubscriptionReport,
    unsubscribe_report: SubscriptionReport,
    warm_error: Option<String>,
    /// Operation names in call order
    pub calls: RefCell<Vec<String>>,
    /// Every login sent, secrets included
    pub logins: RefCell<Vec<Login>>,
}

impl FakePackageClient {
    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn logged_in(identity: &str) -> Self {
        Self {
            identity: RefCell::new(Some(identity.to_string())),
            ..Self::default()
        }
    }

    /// Reject the first `count` logins, accept the rest
    pub fn rejecting_logins(self, count: usize) -> Self {
        self.login_replies
            .borrow_mut()
            .extend(std::iter::repeat_n(LoginReply::Reject, count));
        self
    }

    pub fn with_login_replies(self, replies: &[LoginReply]) -> Self {
        self.login_replies.borrow_mut().extend(replies.iter().copied());
        self
    }

    pub fn with_subscribe_report(mut self, report: SubscriptionReport) -> Self {
        self.subscribe_report = report;
        self
    }

    pub fn with_unsubscribe_report(mut self, report: SubscriptionReport) -> Self {
        self.unsubscribe_report = report;
        self
    }

    pub fn failing_cache_warm(mut self, reason: &str) -> Self {
        self.warm_error = Some(reason.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

impl PackageClient for FakePackageClient {
    fn current_identity(&self) -> Result<Option<String>> {
        self.record("whoami");
        Ok(self.identity.borrow().clone())
    }

    fn login(&self, login: &Login) -> Result<()> {
        self.record("login");
        self.logins.borrow_mut().push(login.clone());
        let reply = self
            .login_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or(LoginReply::Accept);
        let identity = match login {
            Login::ApiKey { .. } => "api-key".to_string(),
            Login::Password { identity, .. } => identity.clone(),
        };
        match reply {
            LoginReply::Accept => {
                *self.identity.borrow_mut() = Some(identity);
                Ok(())
            }
            LoginReply::Reject => Err(session::login_rejected(identity, "invalid credentials")),
            LoginReply::Break => Err(remote::command_failed("appclient", "connection reset")),
        }
    }

    fn subscribe(&self, name: &str) -> Result<SubscriptionReport> {
        self.record(format!("subscribe {name}"));
        Ok(self.subscribe_report.clone())
    }

    fn unsubscribe(&self, name: &str) -> Result<SubscriptionReport> {
        self.record(format!("unsubscribe {name}"));
        Ok(self.unsubscribe_report.clone())
    }

    fn cache_warm(&self, name: &str) -> Result<()> {
        self.record(format!("warm {name}"));
        match &self.warm_error {
            Some(reason) => Err(subscription::cache_warm_failed(name, reason.clone())),
            None => Ok(()),
        }
    }
}

/// [`CredentialPrompt`] replaying canned answers; runs out as "cancelled"
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: RefCell<VecDeque<Option<(String, String)>>>,
    /// Hint passed to each `ask` call
    pub hints: RefCell<Vec<Option<String>>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[(&str, &str)]) -> Self {
        let prompt = Self::default();
        prompt.answers.borrow_mut().extend(
            answers
                .iter()
                .map(|(id, secret)| Some(((*id).to_string(), (*secret).to_string()))),
        );
        prompt
    }

    /// Queue an explicit cancellation
    pub fn then_cancel(self) -> Self {
        self.answers.borrow_mut().push_back(None);
        self
    }

    pub fn asked(&self) -> usize {
        self.hints.borrow().len()
    }
}

impl CredentialPrompt for ScriptedPrompt {
    fn ask(&self, identity_hint: Option<&str>) -> Result<Option<(String, Secret)>> {
        self.hints
            .borrow_mut()
            .push(identity_hint.map(str::to_string));
        Ok(self
            .answers
            .borrow_mut()
            .pop_front()
            .flatten()
            .map(|(id, secret)| (id, Secret::new(secret))))
    }
}

/// [`ShortcutInspector`] that knows every app except the ones marked broken
#[derive(Default)]
pub struct FakeShortcutInspector {
    broken: HashSet<String>,
    overrides: HashMap<String, AppShortcutInfo>,
    pub resolved: RefCell<Vec<String>>,
}

impl FakeShortcutInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, app_name: &str) -> Self {
        self.broken.insert(app_name.to_string());
        self
    }

    pub fn with_shortcut(mut self, info: AppShortcutInfo) -> Self {
        self.overrides.insert(info.name.clone(), info);
        self
    }
}

impl ShortcutInspector for FakeShortcutInspector {
    fn resolve(&self, app_name: &str) -> Result<AppShortcutInfo> {
        self.resolved.borrow_mut().push(app_name.to_string());
        if self.broken.contains(app_name) {
            return Err(catalog::shortcut_failed(app_name, "shortcut not found"));
        }
        Ok(self
            .overrides
            .get(app_name)
            .cloned()
            .unwrap_or_else(|| shortcut(app_name)))
    }
}

/// Plausible shortcut metadata for `name`
pub fn shortcut(name: &str) -> AppShortcutInfo {
    let exe = format!(r"C:\Program Files\{name}\{name}.exe");
    AppShortcutInfo {
        name: name.to_string(),
        target_path: exe.clone(),
        arguments: String::new(),
        icon: IconSource { path: exe, index: 0 },
    }
}

/// One simulated machine behind a [`FakeFleet`]
#[derive(Default)]
pub struct FakeHost {
    pub bootstrap_error: Option<String>,
    pub client: FakePackageClient,
    pub inspector: FakeShortcutInspector,
}

/// [`RemoteExecutor`] answering agent requests from per-host fakes
#[derive(Default)]
pub struct FakeFleet {
    hosts: HashMap<String, FakeHost>,
    /// Host names in the order they received requests, one per request
    pub visits: RefCell<Vec<String>>,
}

impl FakeFleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, name: &str, host: FakeHost) -> Self {
        self.hosts.insert(name.to_string(), host);
        self
    }

    pub fn host(&self, name: &str) -> &FakeHost {
        &self.hosts[name]
    }

    /// Distinct hosts contacted, in first-contact order
    pub fn contacted(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for name in self.visits.borrow().iter() {
            if !seen.contains(name) {
                seen.push(name.clone());
            }
        }
        seen
    }

    fn dispatch(host: &FakeHost, request: &AgentRequest) -> Result<AgentResponse> {
        Ok(match request {
            AgentRequest::EnsureRuntime => match &host.bootstrap_error {
                Some(reason) => return Err(bootstrap::install_failed(reason.clone())),
                None => AgentResponse::Runtime {
                    path: "/usr/local/bin/appclient".into(),
                },
            },
            AgentRequest::CurrentIdentity => AgentResponse::Identity {
                identity: host.client.current_identity()?,
            },
            AgentRequest::Login { login } => {
                host.client.login(login)?;
                AgentResponse::Done
            }
            AgentRequest::Subscribe { name } => AgentResponse::Report {
                report: host.client.subscribe(name)?,
            },
            AgentRequest::Unsubscribe { name } => AgentResponse::Report {
                report: host.client.unsubscribe(name)?,
            },
            AgentRequest::CacheWarm { name } => {
                host.client.cache_warm(name)?;
                AgentResponse::Done
            }
            AgentRequest::ResolveShortcut { name } => AgentResponse::Shortcut {
                info: host.inspector.resolve(name)?,
            },
        })
    }
}

impl RemoteExecutor for FakeFleet {
    fn execute(&self, target: &TargetHost, request: &AgentRequest) -> Result<AgentResponse> {
        self.visits.borrow_mut().push(target.name.clone());
        let Some(host) = self.hosts.get(&target.name) else {
            return Err(remote::execution_failed(target.name.clone(), "host unreachable"));
        };
        // Serialize like the real agent so only wire-safe errors survive
        Ok(match Self::dispatch(host, request) {
            Ok(response) => response,
            Err(e) => AgentResponse::Failed {
                error: AgentError::from_error(&e),
            },
        })
    }
}
