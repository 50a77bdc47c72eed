//! Package client abstraction
//!
//! The package client is the external program that logs a machine in to the
//! package registry and subscribes it to channels. Every operation is
//! machine-wide (all users).

mod command;

pub use command::CommandPackageClient;

use crate::domain::{Login, SubscriptionReport};
use crate::error::Result;

/// Operations of the remote package system on one host
pub trait PackageClient {
    /// Identity of the current session, or `None` when logged out
    fn current_identity(&self) -> Result<Option<String>>;

    /// Attempt one login. A rejected login is `SyncError::LoginRejected`.
    fn login(&self, login: &Login) -> Result<()>;

    /// Subscribe the machine and capture the event stream
    fn subscribe(&self, name: &str) -> Result<SubscriptionReport>;

    /// Unsubscribe the machine and capture the event stream
    fn unsubscribe(&self, name: &str) -> Result<SubscriptionReport>;

    /// Pre-download the subscription's content
    fn cache_warm(&self, name: &str) -> Result<()>;
}
