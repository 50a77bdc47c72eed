//! Package client bootstrap
//!
//! Makes sure the package client runtime exists on a host:
//! 1. Look through the configured install paths; the first existing one wins
//! 2. Otherwise download the installer into a temporary artifact
//! 3. Run it silently for all users and wait for it to finish
//! 4. Look again; a runtime that is still missing is an install failure
//!
//! The temporary artifact is removed on every exit path. An installed
//! runtime costs one lookup and nothing else.

mod download;
mod installer;


pub use download::{Downloader, HttpDownloader};
pub use installer::{InstallerRunner, ProcessInstallerRunner};

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::BootstrapConfig;
use crate::error::{Result, SyncError, bootstrap};
use crate::temp;

/// Something that can hand out the path of an installed package client
pub trait RuntimeProvisioner {
    fn ensure_runtime(&self) -> Result<PathBuf>;
}

/// Installs the package client when it is missing
pub struct Bootstrapper {
    config: BootstrapConfig,
    downloader: Box<dyn Downloader>,
    runner: Box<dyn InstallerRunner>,
}

impl Bootstrapper {
    pub fn new(
        config: BootstrapConfig,
        downloader: Box<dyn Downloader>,
        runner: Box<dyn InstallerRunner>,
    ) -> Self {
        Self {
            config,
            downloader,
            runner,
        }
    }

    /// First configured install path that exists
    pub fn locate(&self) -> Option<PathBuf> {
        self.config.install_paths.iter().find_map(|raw| {
            let expanded = match shellexpand::full(raw) {
                Ok(p) => p.into_owned(),
                Err(e) => {
                    tracing::debug!(path = %raw, error = %e, "skipping unexpandable install path");
                    return None;
                }
            };
            let path = PathBuf::from(expanded);
            path.exists().then_some(path)
        })
    }

    fn install(&self) -> Result<()> {
        let url = self.config.download_url.as_str();
        if url.is_empty() {
            return Err(bootstrap::download_failed(
                url,
                "bootstrap.download_url is not set",
            ));
        }

        let mut artifact = temp::installer_artifact(artifact_extension(url))
            .map_err(|e| bootstrap::download_failed(url, format!("cannot create temp file: {e}")))?;

        tracing::info!(url = %url, "downloading client installer");
        let bytes = self
            .downloader
            .download(url, artifact.as_file_mut())
            .map_err(|e| {
                if matches!(e, SyncError::DownloadFailed { .. }) {
                    e
                } else {
                    bootstrap::download_failed(url, e.to_string())
                }
            })?;
        artifact
            .as_file_mut()
            .flush()
            .map_err(|e| bootstrap::download_failed(url, e.to_string()))?;
        if bytes == 0 {
            return Err(bootstrap::download_failed(url, "downloaded installer is empty"));
        }

        // Close the write handle; the path guard still deletes the file on drop
        let artifact = artifact.into_temp_path();
        self.run_installer(&artifact)
    }

    fn run_installer(&self, artifact: &Path) -> Result<()> {
        tracing::info!(artifact = %artifact.display(), "running client installer");
        let code = self
            .runner
            .run(artifact, &self.config.installer_args)
            .map_err(|e| bootstrap::install_failed(e.to_string()))?;

        match code {
            Some(0) => Ok(()),
            Some(code) => Err(bootstrap::install_failed(format!(
                "installer exited with code {code}"
            ))),
            None => Err(bootstrap::install_failed("installer was terminated by a signal")),
        }
    }
}

impl RuntimeProvisioner for Bootstrapper {
    fn ensure_runtime(&self) -> Result<PathBuf> {
        if let Some(path) = self.locate() {
            tracing::debug!(path = %path.display(), "client runtime already installed");
            return Ok(path);
        }

        self.install()?;

        self.locate().ok_or_else(|| {
            bootstrap::install_failed(format!(
                "client not found after install (looked in: {})",
                self.config.install_paths.join(", ")
            ))
        })
    }
}

/// Extension of the last URL path segment, ignoring query and fragment
fn artifact_extension(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (1..=4).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext
        }
        _ => "",
    }
}
