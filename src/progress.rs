//! Spinners for long-running waits.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start a spinner, hidden when `quiet`.
pub fn spinner(msg: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg} {elapsed:.dim}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Clear the spinner so the final status line can be printed.
pub fn finish(pb: &ProgressBar) {
    pb.finish_and_clear();
}
