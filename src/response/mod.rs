//! Recovery of structured data from free-text agent answers.
//!
//! The agent is asked for pure JSON but may wrap it in a fenced block or
//! in prose. Extraction precedence is fixed:
//!
//! 1. the body of the first ```` ```json ```` fenced block;
//! 2. otherwise the span from the first `[` to the last `]`;
//! 3. otherwise the trimmed text itself.
//!
//! The payload is then parsed as JSON, falling back to a lenient
//! Python-literal reader.

mod literal;

pub use literal::{parse_literal, LiteralError};

use crate::quiz::QuizQuestion;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Failure to turn an agent answer into quiz data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Neither strict JSON nor the literal reader accepted the payload.
    #[error("Could not parse the quiz output: {message}")]
    Malformed { raw: String, message: String },

    /// The payload parsed but is not a list of questions.
    #[error("Quiz output has an unexpected shape: {message}")]
    UnexpectedShape { raw: String, message: String },

    /// The quiz tool itself reported an error record.
    #[error("{0}")]
    ToolReported(String),
}

impl ParseError {
    /// The offending text, when there is one to show.
    pub fn raw(&self) -> Option<&str> {
        match self {
            ParseError::Malformed { raw, .. } | ParseError::UnexpectedShape { raw, .. } => {
                Some(raw)
            }
            ParseError::ToolReported(_) => None,
        }
    }

    /// Parser diagnostic without the headline.
    pub fn detail(&self) -> &str {
        match self {
            ParseError::Malformed { message, .. }
            | ParseError::UnexpectedShape { message, .. } => message,
            ParseError::ToolReported(message) => message,
        }
    }
}

fn fenced_json() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```json\s*(.*?)```").expect("valid fenced-block regex"))
}

/// Pull the most likely JSON payload out of `text`.
pub fn extract_json_payload(text: &str) -> String {
    if let Some(body) = fenced_json().captures(text).and_then(|c| c.get(1)) {
        return body.as_str().trim().to_string();
    }

    if let (Some(first), Some(last)) = (text.find('['), text.rfind(']')) {
        if last > first {
            return text[first..=last].trim().to_string();
        }
    }

    text.trim().to_string()
}

/// Parse a payload as JSON, then as a Python-style literal.
pub fn parse_payload(payload: &str) -> Result<Value, ParseError> {
    match serde_json::from_str(payload) {
        Ok(value) => Ok(value),
        Err(json_err) => {
            debug!("Strict JSON parse failed ({}), trying literal parser", json_err);
            parse_literal(payload).map_err(|e| ParseError::Malformed {
                raw: payload.to_string(),
                message: e.to_string(),
            })
        }
    }
}

/// Extract, parse and interpret an agent answer as a quiz.
pub fn parse_quiz(text: &str) -> Result<Vec<QuizQuestion>, ParseError> {
    let payload = extract_json_payload(text);
    let value = parse_payload(&payload)?;
    questions_from_value(value, &payload)
}

fn questions_from_value(value: Value, raw: &str) -> Result<Vec<QuizQuestion>, ParseError> {
    let shape = |message: String| ParseError::UnexpectedShape {
        raw: raw.to_string(),
        message,
    };

    let items = match value {
        Value::Array(items) => items,
        other => return Err(shape(format!("expected a list, got {}", type_name(&other)))),
    };

    if let Some(error) = items
        .first()
        .and_then(|first| first.get("error"))
        .and_then(Value::as_str)
    {
        return Err(ParseError::ToolReported(error.to_string()));
    }

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| question_from_value(item).map_err(|m| shape(format!("item {}: {}", i + 1, m))))
        .collect()
}

fn question_from_value(item: Value) -> Result<QuizQuestion, String> {
    let obj = item
        .as_object()
        .ok_or_else(|| format!("expected an object, got {}", type_name(&item)))?;

    let question = obj
        .get("question")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing 'question'".to_string())?
        .to_string();

    let options = match obj.get("options") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(opts)) => opts.iter().map(display_value).collect(),
        Some(other) => return Err(format!("'options' must be a list, got {}", type_name(other))),
    };

    let answer = match obj.get("answer") {
        None | Some(Value::Null) => None,
        Some(value) => Some(display_value(value)),
    };

    Ok(QuizQuestion {
        question,
        options,
        answer,
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
