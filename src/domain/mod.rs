//! Domain models for channelsync
//!
//! This module contains pure domain objects representing the subscription,
//! catalog and deployment entities. These types carry no I/O and hold the
//! naming and aggregation invariants the reconciler relies on.

pub mod catalog;
pub mod event;
pub mod host;
pub mod outcome;
pub mod request;
pub mod shortcut;

pub use catalog::{CatalogEntry, CommandLine, NewCatalogEntry, canonical_name};
pub use event::{EventKind, SubscriptionEvent, SubscriptionReport};
pub use host::TargetHost;
pub use outcome::{
    DeploymentOutcome, HostOutcome, PublishFailure, ReconcileResult, Stage, StageFailure,
};
pub use request::{Credentials, Login, Mode, RequestSpec, Secret, TargetScope};
pub use shortcut::{AppShortcutInfo, IconSource};
