//! Catalog reached through an external management command
//!
//! The bridge program gets one verb per call and speaks JSON:
//!
//! | verb      | arguments                   | stdin            | stdout              |
//! |-----------|-----------------------------|------------------|---------------------|
//! | `find`    | `--group=G --name=N`        |                  | entry or `null`     |
//! | `create`  |                             | new entry        | created entry       |
//! | `delete`  |                             | entry            |                     |
//! | `members` | `--group=G`                 |                  | array of host names |
//! | `list`    | `[--group=G]`               |                  | array of entries    |
//!
//! Values are attached with `=` so a name starting with `-` is never read
//! as an option. A non-zero exit is a failed operation; stderr carries the
//! reason.

use std::process::Command;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::CatalogClient;
use crate::domain::{CatalogEntry, NewCatalogEntry, TargetHost};
use crate::error::{Result, catalog};
use crate::process;

#[derive(Debug, Clone)]
pub struct CommandCatalog {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandCatalog {
    pub fn new(program: String, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program,
            args,
            timeout,
        }
    }

    fn call(&self, verb: &str, verb_args: &[&str], stdin: Option<&[u8]>) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(verb).args(verb_args);
        let output = process::run(&mut cmd, stdin, self.timeout)?;
        if !output.success() {
            return Err(catalog::operation_failed(format!(
                "{} {verb}: {}",
                self.program,
                output.failure_reason()
            )));
        }
        Ok(output.stdout)
    }

    fn group_arg(group: &str) -> String {
        format!("--group={group}")
    }

    fn call_json<T: DeserializeOwned>(
        &self,
        verb: &str,
        verb_args: &[&str],
        stdin: Option<&[u8]>,
    ) -> Result<T> {
        let stdout = self.call(verb, verb_args, stdin)?;
        serde_json::from_str(stdout.trim()).map_err(|e| {
            catalog::operation_failed(format!("{} {verb} printed invalid JSON: {e}", self.program))
        })
    }
}

impl CatalogClient for CommandCatalog {
    fn find(&self, canonical_name: &str, group: &str) -> Result<Option<CatalogEntry>> {
        let name_arg = format!("--name={canonical_name}");
        self.call_json("find", &[&Self::group_arg(group), &name_arg], None)
    }

    fn create(&self, entry: &NewCatalogEntry) -> Result<CatalogEntry> {
        let request = serde_json::to_vec(entry)?;
        self.call_json("create", &[], Some(&request))
    }

    fn delete(&self, entry: &CatalogEntry) -> Result<()> {
        let request = serde_json::to_vec(entry)?;
        self.call("delete", &[], Some(&request)).map(|_| ())
    }

    fn list_group_members(&self, group: &str) -> Result<Vec<TargetHost>> {
        self.call_json("members", &[&Self::group_arg(group)], None)
    }

    fn list(&self, group: Option<&str>) -> Result<Vec<CatalogEntry>> {
        match group {
            Some(group) => self.call_json("list", &[&Self::group_arg(group)], None),
            None => self.call_json("list", &[], None),
        }
    }
}
