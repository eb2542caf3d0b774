//! Interactive prompt facility
//!
//! Presents a yes/no/free-text question on the console. Workers receive the
//! prompt as an injectable function so tests can script responses without a
//! terminal.

use anyhow::Result;
use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::sync::Arc;

/// Parsed response to an interactive question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer {
    /// Affirmative with default behavior (`y`, `yes`)
    Yes,
    /// Negative or empty response
    No,
    /// Free-text override (e.g. a custom commit message)
    Text(String),
    /// Literal request to show more detail and re-ask (`show`)
    ShowMore,
}

impl Answer {
    pub fn is_affirmative(&self) -> bool {
        matches!(self, Answer::Yes | Answer::Text(_))
    }
}

/// Type alias for the interactive prompt function.
/// Takes the question text and returns the parsed answer.
pub type PromptFn =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<Answer>> + Send>> + Send + Sync>;

/// Classifies one line of user input.
pub fn parse_answer(line: &str) -> Answer {
    let trimmed = line.trim();
    match trimmed.to_lowercase().as_str() {
        "" | "n" | "no" => Answer::No,
        "y" | "yes" => Answer::Yes,
        "show" => Answer::ShowMore,
        _ => Answer::Text(trimmed.to_string()),
    }
}

/// Console-backed prompt: prints the question and reads one stdin line off
/// the async runtime.
pub fn stdin_prompt() -> PromptFn {
    Arc::new(|question: String| -> Pin<Box<dyn Future<Output = Result<Answer>> + Send>> {
        Box::pin(async move {
            let line = tokio::task::spawn_blocking(move || -> Result<String> {
                print!("{question} ");
                std::io::stdout().flush()?;
                let mut line = String::new();
                std::io::stdin().read_line(&mut line)?;
                Ok(line)
            })
            .await??;
            Ok(parse_answer(&line))
        })
    })
}

/// Scripted prompt that replays a fixed sequence of answers; used by tests
/// and by non-interactive callers.
pub fn scripted_prompt(answers: Vec<Answer>) -> PromptFn {
    let remaining = Arc::new(std::sync::Mutex::new(answers));
    Arc::new(move |_question: String| -> Pin<Box<dyn Future<Output = Result<Answer>> + Send>> {
        let remaining = Arc::clone(&remaining);
        Box::pin(async move {
            let mut guard = remaining.lock().expect("scripted prompt mutex poisoned");
            if guard.is_empty() {
                Ok(Answer::No)
            } else {
                Ok(guard.remove(0))
            }
        })
    })
}
