//! Subscription event stream types

use serde::{Deserialize, Serialize};

/// Kind of change reported by the package client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Install,
    Uninstall,
    Error,
}

/// One change reported for a subscribe or unsubscribe operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionEvent {
    /// Application name, unique within one reconciliation pass
    #[serde(default)]
    pub name: String,

    #[serde(rename = "event")]
    pub kind: EventKind,

    /// Populated only for [`EventKind::Error`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubscriptionEvent {
    #[cfg(test)]
    pub fn install(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EventKind::Install,
            message: None,
        }
    }

    #[cfg(test)]
    pub fn uninstall(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EventKind::Uninstall,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            kind: EventKind::Error,
            message: Some(message.into()),
        }
    }
}

/// Captured event stream plus the overall status of the operation
///
/// A report can be successful and still carry `Error` events; only
/// `success == false` means the operation itself failed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubscriptionReport {
    pub success: bool,
    #[serde(default)]
    pub events: Vec<SubscriptionEvent>,
}

impl SubscriptionReport {
    pub fn succeeded(events: Vec<SubscriptionEvent>) -> Self {
        Self {
            success: true,
            events,
        }
    }

    pub fn failed(events: Vec<SubscriptionEvent>) -> Self {
        Self {
            success: false,
            events,
        }
    }

    /// Messages of all `Error` events, in reported order
    pub fn error_messages(&self) -> Vec<String> {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Error)
            .map(|e| e.message.clone().unwrap_or_else(|| e.name.clone()))
            .collect()
    }

    /// Names of installed applications, in reported order
    pub fn installed(&self) -> Vec<String> {
        self.names_of(EventKind::Install)
    }

    /// Names of uninstalled applications, in reported order
    pub fn removed(&self) -> Vec<String> {
        self.names_of(EventKind::Uninstall)
    }

    fn names_of(&self, kind: EventKind) -> Vec<String> {
        self.events
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.name.clone())
            .collect()
    }
}
