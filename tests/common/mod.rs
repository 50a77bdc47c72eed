//! Common test utilities for channelsync integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Package client stand-in: already logged in, installs two apps on subscribe
/// and removes them on unsubscribe
#[allow(dead_code)]
pub const FAKE_CLIENT: &str = r#"#!/bin/sh
case "$1" in
  whoami) echo '{"identity":"alice"}' ;;
  login) cat >/dev/null; exit 0 ;;
  subscribe) echo '{"status":"ok","events":[{"event":"install","name":"Microsoft Word"},{"event":"install","name":"Paint.NET"}]}' ;;
  unsubscribe) echo '{"status":"ok","events":[{"event":"uninstall","name":"Paint.NET"}]}' ;;
  warm) exit 0 ;;
  *) exit 9 ;;
esac
"#;

/// Shortcut helper stand-in printing a shortcut for whatever name it is given
#[allow(dead_code)]
pub const FAKE_SHORTCUT: &str =
    r#"printf '{"name":"%s","targetPath":"/opt/apps/%s","icon":{"path":"/opt/apps/icons","index":0}}' "$2" "$2""#;

/// A scratch directory holding a config file, a file catalog and fake tools
pub struct TestEnv {
    pub temp: TempDir,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        Self { temp }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    pub fn config_path(&self) -> PathBuf {
        self.path("config.yaml")
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.path("catalog.json")
    }

    /// Write a file in the scratch directory
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Read a file from the scratch directory
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("Failed to read file")
    }

    /// Write an executable script
    #[cfg(unix)]
    pub fn write_script(&self, name: &str, content: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.write_file(name, content);
        let mut perms = std::fs::metadata(&path)
            .expect("Failed to stat script")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("Failed to chmod script");
        path
    }

    /// Seed the file catalog with delivery groups and no entries
    pub fn write_catalog_groups(&self, groups: &[(&str, &[&str])]) {
        let groups: serde_json::Map<String, serde_json::Value> = groups
            .iter()
            .map(|(group, hosts)| ((*group).to_string(), serde_json::json!(hosts)))
            .collect();
        let document = serde_json::json!({ "entries": [], "groups": groups });
        self.write_file("catalog.json", &document.to_string());
    }

    /// Write a config using the fake client and shortcut helper
    #[cfg(unix)]
    pub fn write_fake_host_config(&self) {
        let client = self.write_script("appclient", FAKE_CLIENT);
        let shortcut = serde_json::to_string(FAKE_SHORTCUT).expect("Failed to quote script");
        let config = format!(
            "bootstrap:\n  install_paths: [\"{client}\"]\n\
             shortcuts:\n  command: [\"sh\", \"-c\", {shortcut}, \"inspect\"]\n\
             catalog:\n  backend: file\n  path: \"{catalog}\"\n  lock_dir: \"{locks}\"\n",
            client = client.display(),
            catalog = self.catalog_path().display(),
            locks = self.temp.path().display(),
        );
        self.write_file("config.yaml", &config);
    }

    /// The real binary with a clean environment pointing at this scratch dir
    pub fn command(&self) -> Command {
        let mut cmd = channelsync_cmd();
        cmd.env_remove("CHANNELSYNC_CONFIG")
            .env_remove("CHANNELSYNC_CATALOG")
            .env_remove("CHANNELSYNC_SECRET")
            .env("RUST_LOG", "warn")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated, dead_code)]
pub fn channelsync_cmd() -> Command {
    Command::cargo_bin("channelsync").expect("Failed to locate channelsync binary")
}
