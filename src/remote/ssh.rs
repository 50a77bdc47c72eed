//! Executor that runs `channelsync agent` on the target over SSH

use std::process::Command;
use std::time::Duration;

use super::RemoteExecutor;
use super::protocol::{AgentRequest, AgentResponse};
use crate::config::RemoteConfig;
use crate::domain::TargetHost;
use crate::error::{Result, SyncError, remote};
use crate::process;

#[derive(Debug, Clone)]
pub struct SshExecutor {
    user: Option<String>,
    identity_file: Option<String>,
    options: Vec<String>,
    agent_program: String,
    timeout: Duration,
}

impl SshExecutor {
    pub fn from_config(config: &RemoteConfig, timeout: Duration) -> Self {
        Self {
            user: config.ssh_user.clone(),
            identity_file: config.identity_file.clone(),
            options: config.ssh_options.clone(),
            agent_program: config.agent_program.clone(),
            timeout,
        }
    }

    fn destination(&self, host: &TargetHost) -> String {
        match &self.user {
            Some(user) => format!("{user}@{}", host.name),
            None => host.name.clone(),
        }
    }

    /// Shell command line run by the remote login shell
    fn remote_command(&self) -> String {
        format!(
            "{} agent",
            shell_escape::escape(self.agent_program.as_str().into())
        )
    }

    fn command(&self, host: &TargetHost) -> Command {
        let mut cmd = Command::new("ssh");
        for option in &self.options {
            cmd.arg("-o").arg(option);
        }
        cmd.arg("-o")
            .arg(format!("ConnectTimeout={}", self.timeout.as_secs().clamp(1, 30)));
        if let Some(identity_file) = &self.identity_file {
            cmd.arg("-i").arg(shellexpand::tilde(identity_file).as_ref());
        }
        cmd.arg(self.destination(host));
        cmd.arg(self.remote_command());
        cmd
    }
}

impl RemoteExecutor for SshExecutor {
    fn execute(&self, host: &TargetHost, request: &AgentRequest) -> Result<AgentResponse> {
        tracing::debug!(host = %host, op = request.op(), "executing over ssh");
        let payload = serde_json::to_vec(request)?;

        let output = process::run(&mut self.command(host), Some(&payload), self.timeout)
            .map_err(|e| match e {
                SyncError::CommandTimedOut { seconds, .. } => remote::execution_failed(
                    host.name.clone(),
                    format!("no agent response within {seconds}s"),
                ),
                other => remote::execution_failed(host.name.clone(), other.to_string()),
            })?;

        // The agent prints exactly one JSON line; login banners may precede it
        let Some(line) = output.stdout.lines().rev().find(|l| !l.trim().is_empty()) else {
            return Err(remote::execution_failed(
                host.name.clone(),
                output.failure_reason(),
            ));
        };
        serde_json::from_str(line.trim()).map_err(|e| {
            if output.success() {
                remote::protocol(format!("{host}: {e}"))
            } else {
                remote::execution_failed(host.name.clone(), output.failure_reason())
            }
        })
    }
}
