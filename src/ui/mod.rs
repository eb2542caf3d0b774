pub mod prompt;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub use prompt::{parse_answer, scripted_prompt, stdin_prompt, Answer, PromptFn};

const SPINNER_TICK_INTERVAL_MS: u64 = 80;

/// Creates a ticking spinner with the given message; caller is responsible
/// for finishing it.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_INTERVAL_MS));
    pb
}
