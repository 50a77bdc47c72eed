//! In-process executor for the controller's own machine

use super::RemoteExecutor;
use super::agent::HostAgent;
use super::protocol::{AgentRequest, AgentResponse};
use crate::domain::TargetHost;
use crate::error::Result;

pub struct LocalExecutor {
    agent: HostAgent,
}

impl LocalExecutor {
    pub fn new(agent: HostAgent) -> Self {
        Self { agent }
    }
}

impl RemoteExecutor for LocalExecutor {
    fn execute(&self, host: &TargetHost, request: &AgentRequest) -> Result<AgentResponse> {
        tracing::trace!(host = %host, op = request.op(), "executing locally");
        Ok(self.agent.handle(request))
    }
}
