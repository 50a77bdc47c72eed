//! Multi-host reconciliation driver
//!
//! Resolves the hosts of a request and runs the per-host pipeline
//! (bootstrap, authenticate, apply) on each, strictly one host after the
//! other in discovery order. A fatal stage failure ends that host's
//! pipeline and is recorded; later hosts still run unless the engine was
//! told to stop on the first failed host.
//!
//! One run shares its login and its dry-run plan across hosts: a secret that
//! worked on one host is used on the next, and a dry run reports each
//! catalog name as published at most once per group.


use std::path::PathBuf;

use crate::bootstrap::RuntimeProvisioner;
use crate::catalog::{CatalogClient, ScopeLocker};
use crate::domain::{
    Credentials, DeploymentOutcome, HostOutcome, RequestSpec, Stage, StageFailure, TargetHost,
    TargetScope,
};
use crate::error::{Result, SyncError, catalog};
use crate::progress::ProgressDisplay;
use crate::reconcile::{DryRunPlan, SubscriptionReconciler};
use crate::remote::{HostClient, RemoteExecutor};
use crate::session::{CredentialPrompt, Session, SessionAuthenticator};

pub struct Engine<'a> {
    executor: &'a dyn RemoteExecutor,
    catalog: &'a dyn CatalogClient,
    locker: &'a ScopeLocker,
    prompt: &'a dyn CredentialPrompt,
    authenticator: SessionAuthenticator,
    stop_on_host_failure: bool,
    progress: Option<&'a ProgressDisplay>,
}

impl<'a> Engine<'a> {
    pub fn new(
        executor: &'a dyn RemoteExecutor,
        catalog: &'a dyn CatalogClient,
        locker: &'a ScopeLocker,
        prompt: &'a dyn CredentialPrompt,
    ) -> Self {
        Self {
            executor,
            catalog,
            locker,
            prompt,
            authenticator: SessionAuthenticator::default(),
            stop_on_host_failure: false,
            progress: None,
        }
    }

    #[must_use]
    pub fn with_max_login_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.authenticator = SessionAuthenticator::new(max_attempts);
        self
    }

    #[must_use]
    pub fn stop_on_host_failure(mut self, stop: bool) -> Self {
        self.stop_on_host_failure = stop;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: &'a ProgressDisplay) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Reconcile every host in the request's scope
    pub fn reconcile(&self, request: &RequestSpec) -> DeploymentOutcome {
        let hosts = match self.resolve_hosts(&request.scope) {
            Ok(hosts) => hosts,
            Err(e) => {
                tracing::error!(error = %e, "no hosts to reconcile");
                return DeploymentOutcome::aborted(e.to_string());
            }
        };

        tracing::info!(
            subscription = %request.subscription,
            mode = %request.mode,
            hosts = hosts.len(),
            "reconciling"
        );
        if let Some(progress) = self.progress {
            progress.set_hosts(hosts.len());
        }

        let mut credentials = request.credentials.clone();
        let plan = DryRunPlan::default();
        let mut outcomes = Vec::with_capacity(hosts.len());
        for host in hosts {
            let outcome = self.run_host(host, request, &mut credentials, &plan);
            let fatal = outcome.stage_failure.is_some();
            outcomes.push(outcome);
            if let Some(progress) = self.progress {
                progress.inc_host();
            }
            if fatal && self.stop_on_host_failure {
                tracing::warn!("stopping after failed host");
                break;
            }
        }

        DeploymentOutcome::from_hosts(outcomes)
    }

    /// Hosts addressed by `scope`, in discovery order
    pub fn resolve_hosts(&self, scope: &TargetScope) -> Result<Vec<TargetHost>> {
        match scope {
            TargetScope::Host(host) => Ok(vec![host.clone()]),
            TargetScope::Group(group) => {
                let members = self
                    .catalog
                    .list_group_members(group)
                    .map_err(|e| catalog::group_discovery_failed(group, e.to_string()))?;
                if members.is_empty() {
                    return Err(catalog::group_discovery_failed(
                        group,
                        "the group has no member hosts",
                    ));
                }
                tracing::debug!(group = %group, members = ?members, "discovered hosts");
                Ok(members)
            }
        }
    }

    /// Make sure the package client is installed on `host`
    pub fn bootstrap(&self, host: &TargetHost) -> Result<PathBuf> {
        HostClient::new(self.executor, host.clone()).ensure_runtime()
    }

    /// Make sure `host` has a session for `credentials`
    pub fn login(&self, host: &TargetHost, credentials: &Credentials) -> Result<Session> {
        let client = HostClient::new(self.executor, host.clone());
        let mut credentials = credentials.clone();
        self.authenticator
            .ensure_session(&client, self.prompt, &mut credentials)
    }

    fn run_host(
        &self,
        host: TargetHost,
        request: &RequestSpec,
        credentials: &mut Credentials,
        plan: &DryRunPlan,
    ) -> HostOutcome {
        let _span = tracing::info_span!("host", host = %host).entered();
        let client = HostClient::new(self.executor, host.clone());
        let failed = |stage: Stage, error: SyncError| {
            tracing::error!(stage = %stage, error = %error, "host failed");
            HostOutcome {
                host: host.clone(),
                stage_failure: Some(StageFailure {
                    stage,
                    code: error.code_str(),
                    error: error.to_string(),
                }),
                result: None,
            }
        };

        self.report_stage(&host, Stage::Bootstrap);
        match client.ensure_runtime() {
            Ok(path) => tracing::debug!(runtime = %path.display(), "client runtime ready"),
            Err(e) => return failed(Stage::Bootstrap, e),
        }

        self.report_stage(&host, Stage::Authenticate);
        if let Err(e) = self
            .authenticator
            .ensure_session(&client, self.prompt, credentials)
        {
            return failed(Stage::Authenticate, e);
        }

        self.report_stage(&host, Stage::Subscribe);
        let reconciler = SubscriptionReconciler::new(self.catalog, self.locker).with_plan(plan);
        match reconciler.apply(&client, &client, request) {
            Ok(result) => {
                tracing::info!(
                    published = result.published.len(),
                    unpublished = result.unpublished.len(),
                    failures = result.publish_failures.len(),
                    "host reconciled"
                );
                HostOutcome {
                    host: host.clone(),
                    stage_failure: None,
                    result: Some(result),
                }
            }
            Err(e) => failed(Stage::Subscribe, e),
        }
    }

    fn report_stage(&self, host: &TargetHost, stage: Stage) {
        if let Some(progress) = self.progress {
            progress.update_stage(host, stage);
        }
    }
}
