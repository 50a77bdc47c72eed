//! Progress bar display for multi-host runs

use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::{Stage, TargetHost};

/// One bar over the hosts of a run, with the current host and stage as message
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let bar = ProgressBar::new(0);
        bar.set_style(style);
        Self { bar }
    }

    /// Display that draws nothing, for machine-readable output
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn set_hosts(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    pub fn update_stage(&self, host: &TargetHost, stage: Stage) {
        self.bar.set_message(format!("{host}: {stage}"));
    }

    pub fn inc_host(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub fn abandon(&self) {
        self.bar.abandon();
    }

    /// Handle for suspending the bar while prompting
    pub fn bar(&self) -> ProgressBar {
        self.bar.clone()
    }
}
