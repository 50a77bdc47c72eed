//! Running host-side work on local and remote machines
//!
//! The controller never calls the package client directly. It sends
//! [`AgentRequest`]s through a [`RemoteExecutor`]: the local executor hands
//! them to an in-process [`HostAgent`], the SSH executor pipes them into
//! `channelsync agent` on the target. [`HostClient`] wraps the exchange
//! behind the ordinary collaborator traits.

mod agent;
mod host_client;
mod local;
mod protocol;
mod ssh;

pub use agent::{HostAgent, serve};
pub use host_client::HostClient;
pub use local::LocalExecutor;
pub use protocol::{AgentError, AgentRequest, AgentResponse};
pub use ssh::SshExecutor;

use crate::config::Config;
use crate::domain::TargetHost;
use crate::error::Result;

/// Executes one agent request on a named host
pub trait RemoteExecutor {
    fn execute(&self, host: &TargetHost, request: &AgentRequest) -> Result<AgentResponse>;
}

/// Sends local hosts to the in-process agent and everything else over SSH
pub struct RoutingExecutor {
    local: LocalExecutor,
    ssh: SshExecutor,
    local_names: Vec<String>,
}

impl RoutingExecutor {
    pub fn from_config(config: &Config) -> Self {
        let mut local_names = config.remote.local_names.clone();
        // HOSTNAME is a shell variable on most unixes; COMPUTERNAME is set on Windows
        for var in ["HOSTNAME", "COMPUTERNAME"] {
            if let Ok(name) = std::env::var(var) {
                if !name.is_empty() {
                    local_names.push(name);
                }
            }
        }

        Self {
            local: LocalExecutor::new(HostAgent::from_config(config)),
            ssh: SshExecutor::from_config(&config.remote, config.timeouts.remote()),
            local_names,
        }
    }

    fn route(&self, host: &TargetHost) -> &dyn RemoteExecutor {
        if host.is_local(&self.local_names) {
            &self.local
        } else {
            &self.ssh
        }
    }
}

impl RemoteExecutor for RoutingExecutor {
    fn execute(&self, host: &TargetHost, request: &AgentRequest) -> Result<AgentResponse> {
        self.route(host).execute(host, request)
    }
}
