//! Installer downloads

use std::io::{self, Write};
use std::time::Duration;

use crate::error::{Result, bootstrap};

/// Fetches a URL into a writer, returning the number of bytes written
pub trait Downloader {
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64>;
}

/// Blocking HTTP(S) downloader
pub struct HttpDownloader {
    agent: ureq::Agent,
}

impl HttpDownloader {
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
        }
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| bootstrap::download_failed(url, e.to_string()))?;
        let mut reader = response.into_body().into_reader();
        io::copy(&mut reader, dest).map_err(|e| bootstrap::download_failed(url, e.to_string()))
    }
}
