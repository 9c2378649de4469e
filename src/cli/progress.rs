//! Terminal progress display for downloads
//!
//! A thin wrapper over `indicatif` that stays silent when stdout is not
//! a terminal or quiet mode is requested, so batch logs are not littered
//! with control sequences.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for a known number of file downloads.
#[derive(Debug)]
pub struct ProgressDisplay {
    bar: Option<ProgressBar>,
}

impl ProgressDisplay {
    /// Create a display for `total` items; invisible when `quiet` is set
    /// or stdout is not a terminal.
    pub fn new(total: u64, quiet: bool) -> Self {
        let bar = if quiet || !atty::is(atty::Stream::Stdout) {
            None
        } else {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .expect("static template is valid")
                .progress_chars("##-"),
            );
            Some(bar)
        };
        Self { bar }
    }

    /// Record one completed item.
    pub fn inc(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
            bar.inc(1);
        }
    }

    /// Finish the display with a closing message.
    pub fn finish(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }
}
