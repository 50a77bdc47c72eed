//! Shortcut metadata lookup
//!
//! Installing an application leaves a platform shortcut behind. The
//! inspector reads it back so the catalog knows what to launch and which
//! icon to show.

use std::process::Command;
use std::time::Duration;

use crate::domain::AppShortcutInfo;
use crate::error::{Result, catalog};
use crate::process;

/// Reads shortcut metadata created as a side effect of an install
pub trait ShortcutInspector {
    fn resolve(&self, app_name: &str) -> Result<AppShortcutInfo>;
}

/// Inspector backed by a helper program printing one JSON document
#[derive(Debug, Clone)]
pub struct CommandShortcutInspector {
    command: Vec<String>,
    timeout: Duration,
}

impl CommandShortcutInspector {
    /// `command` is the program plus leading arguments; `--` and the app name are appended
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self { command, timeout }
    }
}

impl ShortcutInspector for CommandShortcutInspector {
    fn resolve(&self, app_name: &str) -> Result<AppShortcutInfo> {
        let Some((program, args)) = self.command.split_first() else {
            return Err(catalog::shortcut_failed(app_name, "no inspector command configured"));
        };

        let mut cmd = Command::new(program);
        cmd.args(args).arg("--").arg(app_name);
        let output = process::run(&mut cmd, None, self.timeout)?;
        if !output.success() {
            return Err(catalog::shortcut_failed(app_name, output.failure_reason()));
        }

        let info: AppShortcutInfo = serde_json::from_str(output.stdout.trim())
            .map_err(|e| catalog::shortcut_failed(app_name, format!("invalid output: {e}")))?;
        tracing::debug!(app = %app_name, target = %info.target_path, "resolved shortcut");
        Ok(info)
    }
}
