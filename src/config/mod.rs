//! Configuration file handling for channelsync
//!
//! The configuration is a single YAML document. It is looked up in order at:
//! - the path given with `--config`
//! - `$CHANNELSYNC_CONFIG`
//! - `<config dir>/channelsync/config.yaml`
//!
//! A missing file at the default location yields the built-in defaults; a
//! missing file that was asked for explicitly is an error.


use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, config as config_error};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "CHANNELSYNC_CONFIG";

/// Environment variable overriding the file catalog path
pub const CATALOG_ENV: &str = "CHANNELSYNC_CATALOG";

/// Configuration file name under the user config directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bootstrap: BootstrapConfig,
    pub auth: AuthConfig,
    pub timeouts: TimeoutConfig,
    pub engine: EngineConfig,
    pub catalog: CatalogConfig,
    pub shortcuts: ShortcutConfig,
    pub remote: RemoteConfig,
}

/// Where the package client lives and how to install it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Well-known install locations, checked in order; `~` and `$VAR` expand
    pub install_paths: Vec<String>,
    /// Installer download location
    pub download_url: String,
    /// Arguments for a silent, all-users install
    pub installer_args: Vec<String>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            install_paths: default_install_paths(),
            download_url: String::new(),
            installer_args: vec!["--all-users".to_string(), "--silent".to_string()],
        }
    }
}

#[cfg(windows)]
fn default_install_paths() -> Vec<String> {
    vec![
        "${ProgramFiles}/AppClient/appclient.exe".to_string(),
        "${ProgramFiles(x86)}/AppClient/appclient.exe".to_string(),
    ]
}

#[cfg(not(windows))]
fn default_install_paths() -> Vec<String> {
    vec![
        "/usr/local/bin/appclient".to_string(),
        "/opt/appclient/bin/appclient".to_string(),
    ]
}

/// Login behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Cap on interactive login attempts; unset retries until cancelled
    pub max_attempts: Option<u32>,
}

/// Upper bounds for external calls, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeoutConfig {
    pub command_secs: u64,
    pub install_secs: u64,
    pub remote_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            command_secs: 300,
            install_secs: 1800,
            remote_secs: 900,
        }
    }
}

impl TimeoutConfig {
    pub fn command(&self) -> Duration {
        Duration::from_secs(self.command_secs)
    }

    pub fn install(&self) -> Duration {
        Duration::from_secs(self.install_secs)
    }

    pub fn remote(&self) -> Duration {
        Duration::from_secs(self.remote_secs)
    }
}

/// Multi-host run behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Stop at the first host whose pipeline fails instead of moving on
    pub stop_on_host_failure: bool,
}

/// Catalog backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum CatalogBackend {
    /// JSON document on disk
    File { path: PathBuf },
    /// External management command speaking JSON
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

/// Catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    #[serde(flatten)]
    pub backend: CatalogBackend,
    /// Directory for per-group advisory lock files shared across processes
    pub lock_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let path = dirs::data_dir()
            .unwrap_or_else(crate::temp::temp_dir_base)
            .join("channelsync")
            .join("catalog.json");
        Self {
            backend: CatalogBackend::File { path },
            lock_dir: None,
        }
    }
}

/// How shortcut metadata is read on a host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShortcutConfig {
    /// Program plus leading arguments; the application name is appended
    pub command: Vec<String>,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            command: vec!["appclient-shortcut".to_string(), "--format=json".to_string()],
        }
    }
}

/// How non-local hosts are reached
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    pub ssh_user: Option<String>,
    pub identity_file: Option<String>,
    /// Extra `-o` options passed to ssh
    pub ssh_options: Vec<String>,
    /// channelsync executable on the remote hosts
    pub agent_program: String,
    /// Host names that address this machine
    pub local_names: Vec<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            ssh_user: None,
            identity_file: None,
            ssh_options: vec!["BatchMode=yes".to_string()],
            agent_program: "channelsync".to_string(),
            local_names: Vec::new(),
        }
    }
}

impl Config {
    /// Load the configuration, honoring the lookup order and env overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match Self::locate(explicit) {
            (Some(path), _) if path.exists() => Self::from_file(&path)?,
            (Some(path), true) => {
                return Err(config_error::not_found(path.display().to_string()));
            }
            _ => Self::default(),
        };

        if let Ok(path) = env::var(CATALOG_ENV) {
            if !path.is_empty() {
                tracing::debug!(path = %path, "catalog path overridden from environment");
                config.catalog.backend = CatalogBackend::File {
                    path: PathBuf::from(path),
                };
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Returns the candidate path and whether it was asked for explicitly
    fn locate(explicit: Option<&Path>) -> (Option<PathBuf>, bool) {
        if let Some(path) = explicit {
            return (Some(path.to_path_buf()), true);
        }
        if let Ok(path) = env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return (Some(PathBuf::from(path)), true);
            }
        }
        (
            dirs::config_dir().map(|d| d.join("channelsync").join(CONFIG_FILE)),
            false,
        )
    }

    /// Parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            config_error::parse_failed(path.display().to_string(), e.to_string())
        })?;
        Self::from_yaml(&content)
            .map_err(|e| config_error::parse_failed(path.display().to_string(), e.to_string()))
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.bootstrap.install_paths.is_empty() {
            return Err(config_error::invalid(
                "bootstrap.install_paths must list at least one path",
            ));
        }

        let url = &self.bootstrap.download_url;
        if !url.is_empty() && !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(config_error::invalid(format!(
                "bootstrap.download_url must be an http(s) URL, got '{url}'"
            )));
        }

        let timeouts = &self.timeouts;
        if timeouts.command_secs == 0 || timeouts.install_secs == 0 || timeouts.remote_secs == 0 {
            return Err(config_error::invalid("timeouts must be greater than zero"));
        }

        if self.auth.max_attempts == Some(0) {
            return Err(config_error::invalid("auth.max_attempts must be at least 1"));
        }

        if self.shortcuts.command.is_empty() {
            return Err(config_error::invalid("shortcuts.command must name a program"));
        }

        if let CatalogBackend::Command { program, .. } = &self.catalog.backend {
            if program.is_empty() {
                return Err(config_error::invalid("catalog.program must not be empty"));
            }
        }

        Ok(())
    }
}
