//! Subscription reconciliation
//!
//! Applies one subscribe or unsubscribe on a host and converges the
//! delivery group's catalog to what the package client reported:
//!
//! 1. Run the subscription change and capture its event stream
//! 2. A failed change is fatal; its error events become the reason
//! 3. Split events into installed and removed names, keeping report order
//! 4. Optionally warm the local cache (best effort)
//! 5. Publish each installed name that has no entry yet
//! 6. Unpublish each removed name that still has an entry
//!
//! Catalog lookups are scoped to the delivery group, not the host, so a
//! group spanning many hosts publishes each application once. Every
//! find-then-write runs under the group's scope lock.
//!
//! A dry run writes nothing, so the catalog cannot remember what it already
//! planned. [`DryRunPlan`] holds those planned writes instead; share one plan
//! across the hosts of a run so each name is reported as published once.

#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::collections::HashMap;

use crate::catalog::{CatalogClient, ScopeLocker};
use crate::client::PackageClient;
use crate::domain::{
    Mode, NewCatalogEntry, PublishFailure, ReconcileResult, RequestSpec, canonical_name,
};
use crate::error::{Result, subscription};
use crate::shortcut::ShortcutInspector;

/// What happened to one catalog name
enum Change {
    Applied,
    AlreadyDone,
}

/// Catalog writes a dry run would have made, keyed by group and name
#[derive(Debug, Default)]
pub struct DryRunPlan {
    planned: RefCell<HashMap<(String, String), bool>>,
}

impl DryRunPlan {
    /// Whether the plan has `canonical` present in `group`, if it touched it
    fn planned_presence(&self, group: &str, canonical: &str) -> Option<bool> {
        self.planned
            .borrow()
            .get(&(group.to_string(), canonical.to_string()))
            .copied()
    }

    /// Presence as the run so far would have left it
    fn is_present(&self, group: &str, canonical: &str, in_catalog: bool) -> bool {
        self.planned_presence(group, canonical).unwrap_or(in_catalog)
    }

    fn record(&self, group: &str, canonical: &str, present: bool) {
        self.planned
            .borrow_mut()
            .insert((group.to_string(), canonical.to_string()), present);
    }
}

pub struct SubscriptionReconciler<'a> {
    catalog: &'a dyn CatalogClient,
    locker: &'a ScopeLocker,
    plan: Option<&'a DryRunPlan>,
}

impl<'a> SubscriptionReconciler<'a> {
    pub fn new(catalog: &'a dyn CatalogClient, locker: &'a ScopeLocker) -> Self {
        Self {
            catalog,
            locker,
            plan: None,
        }
    }

    /// Track dry-run writes in `plan` instead of a plan private to one apply
    #[must_use]
    pub fn with_plan(mut self, plan: &'a DryRunPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    /// Apply `request` on the host behind `client` and `inspector`
    ///
    /// Returns `SubscriptionFailed` when the package client reports a failed
    /// change; per-entry catalog problems are collected in the result.
    pub fn apply(
        &self,
        client: &dyn PackageClient,
        inspector: &dyn ShortcutInspector,
        request: &RequestSpec,
    ) -> Result<ReconcileResult> {
        let name = request.subscription.as_str();
        let report = match request.mode {
            Mode::Subscribe => client.subscribe(name)?,
            Mode::Unsubscribe => client.unsubscribe(name)?,
        };

        if !report.success {
            let messages = report.error_messages();
            tracing::warn!(subscription = %name, errors = ?messages, "subscription change failed");
            return Err(subscription::failed(name, messages));
        }
        for message in report.error_messages() {
            tracing::warn!(subscription = %name, message = %message, "client reported an error event");
        }

        let mut result = ReconcileResult {
            installed: report.installed(),
            removed: report.removed(),
            dry_run: request.dry_run,
            ..ReconcileResult::default()
        };
        tracing::debug!(
            installed = result.installed.len(),
            removed = result.removed.len(),
            "subscription change applied"
        );

        if request.cache_locally && request.mode == Mode::Subscribe {
            if let Err(e) = client.cache_warm(name) {
                tracing::warn!(subscription = %name, error = %e, "cache warm failed");
                result.cache_warm_error = Some(e.to_string());
            }
        }

        let own_plan = DryRunPlan::default();
        let plan = request.dry_run.then(|| self.plan.unwrap_or(&own_plan));
        match request.catalog_group() {
            Some(group) => {
                let installed = result.installed.clone();
                for app in &installed {
                    self.publish(inspector, app, group, plan, &mut result);
                }
                let removed = result.removed.clone();
                for app in &removed {
                    self.unpublish(app, group, plan, &mut result);
                }
            }
            None => {
                tracing::info!("no delivery group given, catalog left untouched");
                result.catalog_skipped = true;
            }
        }

        result.success = result.publish_failures.is_empty();
        Ok(result)
    }

    fn publish(
        &self,
        inspector: &dyn ShortcutInspector,
        app: &str,
        group: &str,
        plan: Option<&DryRunPlan>,
        result: &mut ReconcileResult,
    ) {
        let dry_run = plan.is_some();
        let canonical = canonical_name(app);
        if canonical.is_empty() {
            result.publish_failures.push(PublishFailure {
                name: app.to_string(),
                reason: "empty canonical name".to_string(),
            });
            return;
        }

        match self.publish_one(inspector, app, &canonical, group, plan) {
            Ok(Change::Applied) => {
                tracing::info!(app = %canonical, group = %group, dry_run, "published");
                result.published.push(canonical);
            }
            Ok(Change::AlreadyDone) => {
                tracing::debug!(app = %canonical, group = %group, "already published");
                result.already_published.push(canonical);
            }
            Err(e) => {
                tracing::warn!(app = %canonical, error = %e, "publish failed");
                result.publish_failures.push(PublishFailure {
                    name: app.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    fn publish_one(
        &self,
        inspector: &dyn ShortcutInspector,
        app: &str,
        canonical: &str,
        group: &str,
        plan: Option<&DryRunPlan>,
    ) -> Result<Change> {
        let _guard = self.locker.lock(group)?;
        let in_catalog = self.catalog.find(canonical, group)?.is_some();
        let present = match plan {
            Some(plan) => plan.is_present(group, canonical, in_catalog),
            None => in_catalog,
        };
        if present {
            return Ok(Change::AlreadyDone);
        }

        let info = inspector.resolve(app)?;
        let mut entry = NewCatalogEntry::from_shortcut(&info, group);
        // The catalog name follows the reported app, not the shortcut title
        entry.canonical_name = canonical.to_string();
        match plan {
            Some(plan) => plan.record(group, canonical, true),
            None => {
                self.catalog.create(&entry)?;
            }
        }
        Ok(Change::Applied)
    }

    fn unpublish(
        &self,
        app: &str,
        group: &str,
        plan: Option<&DryRunPlan>,
        result: &mut ReconcileResult,
    ) {
        let dry_run = plan.is_some();
        let canonical = canonical_name(app);
        if canonical.is_empty() {
            result.unpublish_failures.push(PublishFailure {
                name: app.to_string(),
                reason: "empty canonical name".to_string(),
            });
            return;
        }

        match self.unpublish_one(&canonical, group, plan) {
            Ok(Change::Applied) => {
                tracing::info!(app = %canonical, group = %group, dry_run, "unpublished");
                result.unpublished.push(canonical);
            }
            Ok(Change::AlreadyDone) => {
                tracing::debug!(app = %canonical, group = %group, "already absent");
                result.already_absent.push(canonical);
            }
            Err(e) => {
                tracing::warn!(app = %canonical, error = %e, "unpublish failed");
                result.unpublish_failures.push(PublishFailure {
                    name: app.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    fn unpublish_one(
        &self,
        canonical: &str,
        group: &str,
        plan: Option<&DryRunPlan>,
    ) -> Result<Change> {
        let _guard = self.locker.lock(group)?;
        let existing = self.catalog.find(canonical, group)?;
        if let Some(plan) = plan {
            if !plan.is_present(group, canonical, existing.is_some()) {
                return Ok(Change::AlreadyDone);
            }
            plan.record(group, canonical, false);
            return Ok(Change::Applied);
        }

        let Some(entry) = existing else {
            return Ok(Change::AlreadyDone);
        };
        self.catalog.delete(&entry)?;
        Ok(Change::Applied)
    }
}
