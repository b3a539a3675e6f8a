//! Progress indicators

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for a backend call
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Finish a spinner with a success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a spinner with an error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✗ {}", message));
}

/// Remove a spinner without leaving a line behind
pub fn clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle() {
        let pb = spinner("Calculating route...");
        finish_success(&pb, "Route found");
        assert!(pb.is_finished());
    }

    #[test]
    fn test_spinner_clear() {
        let pb = spinner("Calculating route...");
        clear(&pb);
        assert!(pb.is_finished());
    }
}
