//! Agent command implementation
//!
//! Runs on target hosts under SSH. Reads one request from stdin and
//! answers on stdout; it never prompts.

use std::io;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::remote::{HostAgent, serve};

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let agent = HostAgent::from_config(&config);
    serve(&agent, io::stdin().lock(), io::stdout().lock())
}
