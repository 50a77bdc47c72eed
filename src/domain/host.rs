//! Target host

use std::fmt;

use serde::{Deserialize, Serialize};

/// Names that always address the machine running the engine
const LOCAL_NAMES: &[&str] = &["localhost", ".", "127.0.0.1", "::1"];

/// One machine against which bootstrap, login and reconcile run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetHost {
    pub name: String,
}

impl TargetHost {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn localhost() -> Self {
        Self::new("localhost")
    }

    /// Whether this host is the local machine, given extra local aliases
    pub fn is_local(&self, aliases: &[String]) -> bool {
        LOCAL_NAMES
            .iter()
            .any(|n| self.name.eq_ignore_ascii_case(n))
            || aliases.iter().any(|a| self.name.eq_ignore_ascii_case(a))
    }
}

impl fmt::Display for TargetHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
