//! Package client backed by the installed client executable

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use serde::Deserialize;

use super::PackageClient;
use crate::domain::{Login, SubscriptionEvent, SubscriptionReport};
use crate::error::{Result, remote, session, subscription};
use crate::process::{self, ProcessOutput};

const ALL_USERS: &str = "--all-users";
const JSON_FORMAT: &str = "--format=json";
/// Ends option parsing so names starting with `-` stay positional
const END_OF_OPTIONS: &str = "--";

#[derive(Debug, Deserialize)]
struct WhoamiOutput {
    identity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionOutput {
    status: String,
    #[serde(default)]
    events: Vec<SubscriptionEvent>,
}

/// Runs the client executable found by the bootstrapper
#[derive(Debug, Clone)]
pub struct CommandPackageClient {
    program: PathBuf,
    timeout: Duration,
}

impl CommandPackageClient {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn run(&self, args: &[&str], stdin: Option<&[u8]>) -> Result<ProcessOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        process::run(&mut cmd, stdin, self.timeout)
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn change_subscription(&self, verb: &str, name: &str) -> Result<SubscriptionReport> {
        let output = self.run(&[verb, ALL_USERS, JSON_FORMAT, END_OF_OPTIONS, name], None)?;
        parse_subscription_output(&output)
    }
}

/// Turn client output into a report; only a successful exit may carry bad JSON
fn parse_subscription_output(output: &ProcessOutput) -> Result<SubscriptionReport> {
    match serde_json::from_str::<SubscriptionOutput>(output.stdout.trim()) {
        Ok(parsed) => {
            let success = output.success() && parsed.status.eq_ignore_ascii_case("ok");
            let mut report = SubscriptionReport {
                success,
                events: parsed.events,
            };
            if !success && report.error_messages().is_empty() {
                report
                    .events
                    .push(SubscriptionEvent::error(output.failure_reason()));
            }
            Ok(report)
        }
        Err(_) if !output.success() => Ok(SubscriptionReport::failed(vec![
            SubscriptionEvent::error(output.failure_reason()),
        ])),
        Err(e) => Err(subscription::bad_output(e.to_string())),
    }
}

impl PackageClient for CommandPackageClient {
    fn current_identity(&self) -> Result<Option<String>> {
        let output = self.run(&["whoami", JSON_FORMAT], None)?;
        if !output.success() {
            return Err(remote::command_failed(
                self.program_name(),
                output.failure_reason(),
            ));
        }
        let parsed: WhoamiOutput = serde_json::from_str(output.stdout.trim())
            .map_err(|e| subscription::bad_output(e.to_string()))?;
        Ok(parsed.identity.filter(|i| !i.is_empty()))
    }

    fn login(&self, login: &Login) -> Result<()> {
        let (output, identity) = match login {
            Login::ApiKey { key } => (
                self.run(
                    &["login", ALL_USERS, JSON_FORMAT, "--api-key-stdin"],
                    Some(key.expose().as_bytes()),
                )?,
                "api key".to_string(),
            ),
            Login::Password { identity, secret } => (
                self.run(
                    &[
                        "login",
                        ALL_USERS,
                        JSON_FORMAT,
                        "--password-stdin",
                        END_OF_OPTIONS,
                        identity,
                    ],
                    Some(secret.expose().as_bytes()),
                )?,
                identity.clone(),
            ),
        };

        if output.success() {
            Ok(())
        } else {
            Err(session::login_rejected(identity, output.failure_reason()))
        }
    }

    fn subscribe(&self, name: &str) -> Result<SubscriptionReport> {
        self.change_subscription("subscribe", name)
    }

    fn unsubscribe(&self, name: &str) -> Result<SubscriptionReport> {
        self.change_subscription("unsubscribe", name)
    }

    fn cache_warm(&self, name: &str) -> Result<()> {
        let output = self.run(&["warm", ALL_USERS, JSON_FORMAT, END_OF_OPTIONS, name], None)?;
        if output.success() {
            Ok(())
        } else {
            Err(subscription::cache_warm_failed(name, output.failure_reason()))
        }
    }
}
