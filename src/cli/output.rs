//! CLI output formatting utilities.

use crate::quiz::QuizQuestion;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a block of raw text, indented and dimmed.
    pub fn code(text: &str) {
        for line in text.lines() {
            println!("    {}", style(line).dim());
        }
    }

    /// Print a quiz question with lettered options.
    pub fn quiz_question(number: usize, question: &QuizQuestion) {
        println!("{}", style("---").dim());
        println!("{}", style(format!("Q{}. {}", number, question.question)).bold());
        for (idx, option) in question.options.iter().enumerate() {
            println!("  {}. {}", option_letter(idx), option);
        }
    }

    /// Print the answer line for a question.
    pub fn quiz_answer(question: &QuizQuestion) {
        println!(
            "  {} {}",
            style("Correct Answer:").green().bold(),
            question.answer.as_deref().unwrap_or("N/A")
        );
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Letter label for the option at `idx` (A, B, C, ...).
pub fn option_letter(idx: usize) -> char {
    char::from_u32('A' as u32 + idx as u32).unwrap_or('?')
}

/// Truncate text to `max_chars` characters with an ellipsis.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
