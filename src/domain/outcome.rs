//! Results of reconciliation runs

use std::fmt;

use serde::Serialize;

use super::host::TargetHost;

/// One application that could not be published
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishFailure {
    pub name: String,
    pub reason: String,
}

/// Result of applying one subscription change on one host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileResult {
    /// Names reported as installed, in reported order
    pub installed: Vec<String>,
    /// Names reported as uninstalled, in reported order
    pub removed: Vec<String>,
    /// Canonical names of entries created by this run
    pub published: Vec<String>,
    /// Canonical names that already had an entry
    pub already_published: Vec<String>,
    /// Canonical names of entries deleted by this run
    pub unpublished: Vec<String>,
    /// Canonical names that had no entry to delete
    pub already_absent: Vec<String>,
    pub publish_failures: Vec<PublishFailure>,
    /// Entries that could not be deleted; reported, never fatal
    pub unpublish_failures: Vec<PublishFailure>,
    pub cache_warm_error: Option<String>,
    /// True when catalog reconciliation did not run (no delivery group)
    pub catalog_skipped: bool,
    /// Catalog changes were computed but not applied
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
    pub success: bool,
}

impl ReconcileResult {
    /// Number of catalog mutations this run performed
    pub fn mutations(&self) -> usize {
        self.published.len() + self.unpublished.len()
    }
}

/// Pipeline stage at which a host failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Bootstrap,
    Authenticate,
    Subscribe,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Bootstrap => f.write_str("bootstrap"),
            Stage::Authenticate => f.write_str("authenticate"),
            Stage::Subscribe => f.write_str("subscribe"),
        }
    }
}

/// Fatal failure of one stage for one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub code: String,
    pub error: String,
}

/// Everything recorded for one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostOutcome {
    pub host: TargetHost,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_failure: Option<StageFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ReconcileResult>,
}

impl HostOutcome {
    pub fn succeeded(&self) -> bool {
        self.stage_failure.is_none() && self.result.as_ref().is_some_and(|r| r.success)
    }
}

/// Aggregate result of one reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeploymentOutcome {
    pub success: bool,
    /// Set when the run failed before any host was processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub hosts: Vec<HostOutcome>,
}

impl DeploymentOutcome {
    /// Outcome of a run that failed before reaching any host
    pub fn aborted(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            hosts: Vec::new(),
        }
    }

    /// Build the aggregate from per-host outcomes
    pub fn from_hosts(hosts: Vec<HostOutcome>) -> Self {
        let success = !hosts.is_empty() && hosts.iter().all(HostOutcome::succeeded);
        Self {
            success,
            error: None,
            hosts,
        }
    }

    /// Publish failures across all hosts, tagged with the host name
    pub fn publish_failures(&self) -> Vec<(&TargetHost, &PublishFailure)> {
        self.hosts
            .iter()
            .filter_map(|h| h.result.as_ref().map(|r| (&h.host, r)))
            .flat_map(|(host, r)| r.publish_failures.iter().map(move |f| (host, f)))
            .collect()
    }
}
