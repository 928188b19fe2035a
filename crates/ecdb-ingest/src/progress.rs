//! Progress indicators for ingestion runs
//!
//! Spinners draw to stderr and stay invisible when stderr is not a terminal,
//! so the JSON report on stdout is never interleaved with them.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg} [{elapsed_precise}] {human_pos} processed";

/// Create a spinner counting processed items
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a spinner that never draws (library use and tests)
pub fn hidden() -> ProgressBar {
    ProgressBar::hidden()
}

/// Switch a spinner to the next pass, restarting its counter
pub fn start_pass(pb: &ProgressBar, message: &str) {
    pb.set_position(0);
    pb.set_message(message.to_string());
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner() {
        let pb = create_spinner("Reading release");
        assert!(!pb.is_finished());
        pb.finish_and_clear();
    }

    #[test]
    fn test_start_pass_resets_position() {
        let pb = hidden();
        pb.inc(42);
        start_pass(&pb, "Scanning text dump");
        assert_eq!(pb.position(), 0);
        assert_eq!(pb.message(), "Scanning text dump");
    }
}
