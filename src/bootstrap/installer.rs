//! Installer execution

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use crate::error::Result;
use crate::process;

/// Runs a downloaded installer to completion
pub trait InstallerRunner {
    /// Returns the exit code, or `None` when the process had none
    fn run(&self, artifact: &Path, args: &[String]) -> Result<Option<i32>>;
}

/// Spawns the installer as a child process and waits for it
pub struct ProcessInstallerRunner {
    timeout: Duration,
}

impl ProcessInstallerRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl InstallerRunner for ProcessInstallerRunner {
    fn run(&self, artifact: &Path, args: &[String]) -> Result<Option<i32>> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(artifact, std::fs::Permissions::from_mode(0o755))?;
        }

        let mut cmd = Command::new(artifact);
        cmd.args(args);
        let output = process::run(&mut cmd, None, self.timeout)?;
        if !output.success() {
            tracing::warn!(stderr = %output.stderr.trim(), "installer reported failure");
        }
        Ok(output.status.code())
    }
}
