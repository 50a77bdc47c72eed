//! Reconciliation request types

use std::fmt;

use serde::{Deserialize, Serialize};

use super::host::TargetHost;

/// Whether the subscription is being added or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Subscribe,
    Unsubscribe,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Subscribe => f.write_str("subscribe"),
            Mode::Unsubscribe => f.write_str("unsubscribe"),
        }
    }
}

/// Hosts a reconciliation run addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetScope {
    /// Exactly one explicit host
    Host(TargetHost),
    /// Every member host of the named delivery group, in discovery order
    Group(String),
}

/// A credential value that never shows up in logs or debug output
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Identity, secret and API key supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub identity: Option<String>,
    pub secret: Option<Secret>,
    pub api_key: Option<Secret>,
}

/// One login attempt sent to the package client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Login {
    ApiKey { key: Secret },
    Password { identity: String, secret: Secret },
}

/// Everything one `reconcile` call needs
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub subscription: String,
    pub scope: TargetScope,
    pub credentials: Credentials,
    pub mode: Mode,
    pub cache_locally: bool,
    /// Catalog scope; defaults to the group name for group scopes
    pub delivery_group: Option<String>,
    /// Compute catalog changes without applying them
    pub dry_run: bool,
}

impl RequestSpec {
    /// Delivery group whose catalog is reconciled, if any
    pub fn catalog_group(&self) -> Option<&str> {
        match (&self.delivery_group, &self.scope) {
            (Some(group), _) => Some(group.as_str()),
            (None, TargetScope::Group(group)) => Some(group.as_str()),
            (None, TargetScope::Host(_)) => None,
        }
    }
}
