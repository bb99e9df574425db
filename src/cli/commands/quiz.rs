//! Quiz command implementation.

use crate::assistant::Assistant;
use crate::cli::output::truncate;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::quiz::{QuizQuestion, QuizStyle};
use crate::response::ParseError;
use anyhow::Result;
use console::{style, Term};
use std::path::Path;

/// Run the quiz command.
pub async fn run_quiz(file: &str, style_arg: &str, show_answers: bool, settings: Settings) -> Result<()> {
    let path = Path::new(file);
    let quiz_style = QuizStyle::from(style_arg);

    if let Err(e) = preflight::check(Operation::Document, &settings, Some(path)) {
        Output::error(&format!("{}", e));
        Output::info("Run 'pdfquiz doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let assistant = Assistant::new(&settings)?;

    Output::header("Quiz Generator");
    Output::kv("File", &path.display().to_string());
    Output::kv("Style", &quiz_style.to_string());
    println!();

    let spinner = Output::spinner("Generating quiz...");

    let outcome = match assistant.quiz(path, quiz_style).await {
        Ok(outcome) => {
            spinner.finish_and_clear();
            outcome
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Agent Error: {}", e));
            Output::info(&format!(
                "Check {} and tool configuration.",
                settings.model.api_key_env
            ));
            return Err(e.into());
        }
    };

    for call in &outcome.response.tool_calls {
        tracing::debug!("tool call {} -> {}", call, truncate(&call.result, 80));
    }

    let questions = match outcome.parsed {
        Ok(questions) => questions,
        Err(e) => {
            report_parse_failure(&e);
            return Err(e.into());
        }
    };

    Output::success("Quiz generated successfully!");
    println!();

    let term = Term::stdout();
    let interactive = !show_answers && term.is_term();

    for (i, question) in questions.iter().enumerate() {
        Output::quiz_question(i + 1, question);
        reveal_answer(&term, i + 1, question, interactive)?;
    }

    Ok(())
}

fn report_parse_failure(error: &ParseError) {
    match error {
        ParseError::ToolReported(message) => {
            Output::error(&format!("The quiz tool reported an error: {}", message));
        }
        _ => {
            Output::error("Could not parse the quiz output.");
            if let Some(raw) = error.raw() {
                Output::code(raw);
            }
            Output::info(&format!("Parsing Error: {}", error.detail()));
        }
    }
}

/// Show the answer, waiting for Enter first when running interactively.
fn reveal_answer(term: &Term, number: usize, question: &QuizQuestion, interactive: bool) -> Result<()> {
    if interactive {
        term.write_line(&format!(
            "  {}",
            style(format!("Press Enter to show the answer for question {}", number)).dim()
        ))?;
        term.read_line()?;
    }
    Output::quiz_answer(question);
    println!();
    Ok(())
}
