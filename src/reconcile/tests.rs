//! Reconciler tests against in-memory collaborators

#![allow(clippy::unwrap_used)]

use super::*;
use crate::catalog::MemoryCatalog;
use crate::domain::{
    AppShortcutInfo, Credentials, IconSource, SubscriptionEvent, SubscriptionReport, TargetHost,
    TargetScope,
};
use crate::error::SyncError;
use crate::test_fixtures::{FakePackageClient, FakeShortcutInspector};

const GROUP: &str = "Office Apps";

fn request(mode: Mode) -> RequestSpec {
    RequestSpec {
        subscription: "office".to_string(),
        scope: TargetScope::Group(GROUP.to_string()),
        credentials: Credentials::default(),
        mode,
        cache_locally: false,
        delivery_group: None,
        dry_run: false,
    }
}

fn installs(names: &[&str]) -> SubscriptionReport {
    SubscriptionReport::succeeded(names.iter().map(|n| SubscriptionEvent::install(*n)).collect())
}

fn removals(names: &[&str]) -> SubscriptionReport {
    SubscriptionReport::succeeded(names.iter().map(|n| SubscriptionEvent::uninstall(*n)).collect())
}

#[test]
fn test_installs_are_published_in_report_order() {
    let catalog = MemoryCatalog::new();
    let locker = ScopeLocker::default();
    let client = FakePackageClient::logged_in("alice")
        .with_subscribe_report(installs(&["Paint.NET", "Google Chrome"]));

    let result = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &FakeShortcutInspector::new(), &request(Mode::Subscribe))
        .unwrap();

    assert!(result.success);
    assert_eq!(result.installed, vec!["Paint.NET", "Google Chrome"]);
    assert_eq!(result.published, vec!["PaintNET", "Google Chrome"]);
    assert_eq!(
        catalog.mutations.borrow().as_slice(),
        &["create PaintNET@Office Apps", "create Google Chrome@Office Apps"]
    );
    let paint = &catalog.entries()[0];
    assert_eq!(paint.display_name, "Paint.NET");
    assert_eq!(paint.group, GROUP);
}

#[test]
fn test_second_apply_makes_no_mutations() {
    let catalog = MemoryCatalog::new();
    let locker = ScopeLocker::default();
    let client = FakePackageClient::logged_in("alice")
        .with_subscribe_report(installs(&["Word", "Excel"]));
    let inspector = FakeShortcutInspector::new();
    let reconciler = SubscriptionReconciler::new(&catalog, &locker);

    reconciler.apply(&client, &inspector, &request(Mode::Subscribe)).unwrap();
    let before = catalog.mutation_count();
    let second = reconciler.apply(&client, &inspector, &request(Mode::Subscribe)).unwrap();

    assert_eq!(catalog.mutation_count(), before);
    assert_eq!(second.mutations(), 0);
    assert_eq!(second.already_published, vec!["Word", "Excel"]);
    assert!(second.success);
}

#[test]
fn test_existing_entry_is_never_duplicated() {
    let catalog = MemoryCatalog::new().with_entry("Word", GROUP);
    let locker = ScopeLocker::default();
    let client =
        FakePackageClient::logged_in("alice").with_subscribe_report(installs(&["Word"]));
    let inspector = FakeShortcutInspector::new();

    let result = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &inspector, &request(Mode::Subscribe))
        .unwrap();

    assert_eq!(catalog.mutation_count(), 0);
    assert_eq!(catalog.entries().len(), 1);
    assert_eq!(result.already_published, vec!["Word"]);
    // Existing entries are not even inspected
    assert!(inspector.resolved.borrow().is_empty());
}

#[test]
fn test_duplicate_events_publish_once() {
    let catalog = MemoryCatalog::new();
    let locker = ScopeLocker::default();
    let client = FakePackageClient::logged_in("alice")
        .with_subscribe_report(installs(&["Paint.NET", "PaintNET"]));

    let result = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &FakeShortcutInspector::new(), &request(Mode::Subscribe))
        .unwrap();

    assert_eq!(result.published, vec!["PaintNET"]);
    assert_eq!(result.already_published, vec!["PaintNET"]);
    assert_eq!(catalog.entries().len(), 1);
}

#[test]
fn test_partial_publish_failure() {
    let catalog = MemoryCatalog::new().failing_create("Excel");
    let locker = ScopeLocker::default();
    let client = FakePackageClient::logged_in("alice")
        .with_subscribe_report(installs(&["Word", "Excel", "Outlook"]));

    let result = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &FakeShortcutInspector::new(), &request(Mode::Subscribe))
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.published, vec!["Word", "Outlook"]);
    assert_eq!(result.publish_failures.len(), 1);
    assert_eq!(result.publish_failures[0].name, "Excel");
    assert!(result.publish_failures[0].reason.contains("broker refused"));
}

#[test]
fn test_shortcut_failure_is_a_publish_failure() {
    let catalog = MemoryCatalog::new();
    let locker = ScopeLocker::default();
    let client = FakePackageClient::logged_in("alice")
        .with_subscribe_report(installs(&["Word", "Ghost"]));
    let inspector = FakeShortcutInspector::new().failing_for("Ghost");

    let result = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &inspector, &request(Mode::Subscribe))
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.published, vec!["Word"]);
    assert_eq!(result.publish_failures[0].name, "Ghost");
}

#[test]
fn test_empty_canonical_name_is_reported() {
    let catalog = MemoryCatalog::new();
    let locker = ScopeLocker::default();
    let client =
        FakePackageClient::logged_in("alice").with_subscribe_report(installs(&["..."]));

    let result = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &FakeShortcutInspector::new(), &request(Mode::Subscribe))
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.publish_failures[0].reason, "empty canonical name");
    assert!(catalog.calls.borrow().is_empty());
}

#[test]
fn test_failed_subscription_touches_no_catalog() {
    let catalog = MemoryCatalog::new();
    let locker = ScopeLocker::default();
    let client = FakePackageClient::logged_in("alice").with_subscribe_report(
        SubscriptionReport::failed(vec![SubscriptionEvent::error("bad subscription")]),
    );

    let err = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &FakeShortcutInspector::new(), &request(Mode::Subscribe))
        .unwrap_err();

    match err {
        SyncError::SubscriptionFailed { messages, .. } => {
            assert_eq!(messages, vec!["bad subscription"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(catalog.calls.borrow().is_empty());
}

#[test]
fn test_error_events_in_successful_report_are_not_fatal() {
    let catalog = MemoryCatalog::new();
    let locker = ScopeLocker::default();
    let client = FakePackageClient::logged_in("alice").with_subscribe_report(
        SubscriptionReport::succeeded(vec![
            SubscriptionEvent::install("Word"),
            SubscriptionEvent::error("optional component skipped"),
        ]),
    );

    let result = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &FakeShortcutInspector::new(), &request(Mode::Subscribe))
        .unwrap();

    assert!(result.success);
    assert_eq!(result.published, vec!["Word"]);
}

#[test]
fn test_removals_delete_present_entries_and_skip_absent_ones() {
    let catalog = MemoryCatalog::new().with_entry("Word", GROUP);
    let locker = ScopeLocker::default();
    let client = FakePackageClient::logged_in("alice")
        .with_unsubscribe_report(removals(&["Word", "Excel"]));

    let result = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &FakeShortcutInspector::new(), &request(Mode::Unsubscribe))
        .unwrap();

    assert!(result.success);
    assert_eq!(result.unpublished, vec!["Word"]);
    assert_eq!(result.already_absent, vec!["Excel"]);
    assert!(catalog.entries().is_empty());
    assert_eq!(client.calls(), vec!["unsubscribe office"]);
}

#[test]
fn test_delete_failure_does_not_flip_success() {
    let catalog = MemoryCatalog::new()
        .with_entry("Word", GROUP)
        .failing_delete("Word");
    let locker = ScopeLocker::default();
    let client =
        FakePackageClient::logged_in("alice").with_unsubscribe_report(removals(&["Word"]));

    let result = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &FakeShortcutInspector::new(), &request(Mode::Unsubscribe))
        .unwrap();

    assert!(result.success);
    assert_eq!(result.unpublish_failures[0].name, "Word");
}

#[test]
fn test_cache_warm_failure_is_recorded_only() {
    let catalog = MemoryCatalog::new();
    let locker = ScopeLocker::default();
    let client = FakePackageClient::logged_in("alice")
        .with_subscribe_report(installs(&["Word"]))
        .failing_cache_warm("disk full");
    let mut spec = request(Mode::Subscribe);
    spec.cache_locally = true;

    let result = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &FakeShortcutInspector::new(), &spec)
        .unwrap();

    assert!(result.success);
    assert!(result.cache_warm_error.unwrap().contains("disk full"));
    assert_eq!(result.published, vec!["Word"]);
    assert_eq!(client.calls(), vec!["subscribe office", "warm office"]);
}

#[test]
fn test_cache_warm_is_skipped_on_unsubscribe() {
    let catalog = MemoryCatalog::new();
    let locker = ScopeLocker::default();
    let client = FakePackageClient::logged_in("alice").with_unsubscribe_report(removals(&[]));
    let mut spec = request(Mode::Unsubscribe);
    spec.cache_locally = true;

    SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &FakeShortcutInspector::new(), &spec)
        .unwrap();

    assert_eq!(client.calls(), vec!["unsubscribe office"]);
}

#[test]
fn test_single_host_without_group_skips_catalog() {
    let catalog = MemoryCatalog::new();
    let locker = ScopeLocker::default();
    let client =
        FakePackageClient::logged_in("alice").with_subscribe_report(installs(&["Word"]));
    let mut spec = request(Mode::Subscribe);
    spec.scope = TargetScope::Host(TargetHost::localhost());

    let result = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &FakeShortcutInspector::new(), &spec)
        .unwrap();

    assert!(result.success);
    assert!(result.catalog_skipped);
    assert!(catalog.calls.borrow().is_empty());
}

#[test]
fn test_dry_run_plans_without_mutating() {
    let catalog = MemoryCatalog::new().with_entry("Excel", GROUP);
    let locker = ScopeLocker::default();
    let client = FakePackageClient::logged_in("alice")
        .with_subscribe_report(installs(&["Word", "Excel"]));
    let mut spec = request(Mode::Subscribe);
    spec.dry_run = true;

    let result = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &FakeShortcutInspector::new(), &spec)
        .unwrap();

    assert!(result.dry_run);
    assert_eq!(result.published, vec!["Word"]);
    assert_eq!(result.already_published, vec!["Excel"]);
    assert_eq!(catalog.mutation_count(), 0);
}

#[test]
fn test_dry_run_reports_duplicate_events_once() {
    let catalog = MemoryCatalog::new();
    let locker = ScopeLocker::default();
    let client = FakePackageClient::logged_in("alice")
        .with_subscribe_report(installs(&["Word", "Word"]));
    let mut spec = request(Mode::Subscribe);
    spec.dry_run = true;

    let result = SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &FakeShortcutInspector::new(), &spec)
        .unwrap();

    assert_eq!(result.published, vec!["Word"]);
    assert_eq!(result.already_published, vec!["Word"]);
    assert_eq!(catalog.mutation_count(), 0);
}

#[test]
fn test_shared_plan_spans_applies() {
    let catalog = MemoryCatalog::new().with_entry("Paint", GROUP);
    let locker = ScopeLocker::default();
    let plan = DryRunPlan::default();
    let mut spec = request(Mode::Unsubscribe);
    spec.dry_run = true;
    let first = FakePackageClient::logged_in("alice")
        .with_unsubscribe_report(removals(&["Paint", "Paint"]));
    let second =
        FakePackageClient::logged_in("alice").with_unsubscribe_report(removals(&["Paint"]));

    let reconciler = SubscriptionReconciler::new(&catalog, &locker).with_plan(&plan);
    let first = reconciler
        .apply(&first, &FakeShortcutInspector::new(), &spec)
        .unwrap();
    let second = reconciler
        .apply(&second, &FakeShortcutInspector::new(), &spec)
        .unwrap();

    assert_eq!(first.unpublished, vec!["Paint"]);
    assert_eq!(first.already_absent, vec!["Paint"]);
    assert!(second.unpublished.is_empty());
    assert_eq!(second.already_absent, vec!["Paint"]);
    assert_eq!(catalog.mutation_count(), 0);
    assert_eq!(catalog.entries().len(), 1);
}

#[test]
fn test_entry_takes_launch_details_from_the_shortcut() {
    let catalog = MemoryCatalog::new();
    let locker = ScopeLocker::default();
    let client = FakePackageClient::logged_in("alice").with_subscribe_report(installs(&["R x64"]));
    let inspector = FakeShortcutInspector::new().with_shortcut(AppShortcutInfo {
        name: "R x64".to_string(),
        target_path: "/opt/R/bin/R".to_string(),
        arguments: "--no-save".to_string(),
        icon: IconSource {
            path: "/opt/R/share/R.ico".to_string(),
            index: 1,
        },
    });

    SubscriptionReconciler::new(&catalog, &locker)
        .apply(&client, &inspector, &request(Mode::Subscribe))
        .unwrap();

    let entries = catalog.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].canonical_name, "R x64");
    assert_eq!(entries[0].command_line.executable, "/opt/R/bin/R");
    assert_eq!(entries[0].command_line.arguments, "--no-save");
    assert_eq!(entries[0].display_name, "R x64");
}
