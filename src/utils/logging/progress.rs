//! Progress reporting for pipeline stages
//!
//! Spinners from the indicatif crate. They draw only on an interactive
//! terminal and stay hidden otherwise.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Template used by stage spinners
pub const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg}";

/// Create a spinner for operations without a known length
///
/// # Arguments
/// * `message` - Optional message to display with the spinner
///
/// # Returns
/// A configured spinner `ProgressBar`
#[must_use]
pub fn create_spinner(message: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);

    if let Some(msg) = message {
        pb.set_message(msg.to_string());
    }

    if !pb.is_hidden() {
        pb.enable_steady_tick(Duration::from_millis(100));
    }

    pb
}

/// Finish a progress bar with a completion message
///
/// # Arguments
/// * `pb` - The `ProgressBar` to finish
/// * `message` - Optional completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    if let Some(msg) = message {
        pb.finish_with_message(msg.to_string());
    } else {
        pb.finish();
    }
}

/// A spinner that tracks the active pipeline stage
///
/// Cleared when dropped, so an early return through `?` never leaves a
/// spinner ticking on the terminal.
#[derive(Debug)]
pub struct StageSpinner {
    bar: ProgressBar,
}

impl StageSpinner {
    /// Start a spinner with an initial message
    #[must_use]
    pub fn start(message: &str) -> Self {
        Self {
            bar: create_spinner(Some(message)),
        }
    }

    /// Show the stage currently running
    pub fn stage(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(self, message: &str) {
        finish_progress_bar(&self.bar, Some(message));
    }
}

impl Drop for StageSpinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
