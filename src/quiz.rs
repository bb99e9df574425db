//! Quiz records and the placeholder quiz assembler.
//!
//! The assembler does not read the document yet: it returns the same
//! two questions for every input, chosen only by style.

use serde::{Deserialize, Serialize};

/// A single quiz question.
///
/// Open-ended questions carry no options and no answer; both fields are
/// left out of the JSON form in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl QuizQuestion {
    /// Multiple-choice question.
    pub fn multiple_choice(question: &str, options: &[&str], answer: &str) -> Self {
        Self {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer: Some(answer.to_string()),
        }
    }

    /// Open-ended question.
    pub fn open(question: &str) -> Self {
        Self {
            question: question.to_string(),
            options: Vec::new(),
            answer: None,
        }
    }
}

/// Quiz style requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuizStyle {
    /// Multiple choice with an answer key.
    #[default]
    Mcq,
    /// Open-ended questions.
    Other,
}

impl From<&str> for QuizStyle {
    fn from(s: &str) -> Self {
        // "mcq" and " MCQ " count as MCQ too; any other value is open-ended.
        if s.trim().eq_ignore_ascii_case("mcq") {
            QuizStyle::Mcq
        } else {
            QuizStyle::Other
        }
    }
}

impl From<String> for QuizStyle {
    fn from(s: String) -> Self {
        QuizStyle::from(s.as_str())
    }
}

impl From<QuizStyle> for String {
    fn from(style: QuizStyle) -> Self {
        style.to_string()
    }
}

impl std::str::FromStr for QuizStyle {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(QuizStyle::from(s))
    }
}

impl std::fmt::Display for QuizStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizStyle::Mcq => write!(f, "MCQ"),
            QuizStyle::Other => write!(f, "OTHER"),
        }
    }
}

/// Build a quiz for the given document text.
///
/// Placeholder: `_text` is ignored and the result always has two questions.
pub fn assemble(_text: &str, style: QuizStyle) -> Vec<QuizQuestion> {
    match style {
        QuizStyle::Mcq => vec![
            QuizQuestion::multiple_choice(
                "What is the capital of France?",
                &["Paris", "London", "Rome"],
                "Paris",
            ),
            QuizQuestion::multiple_choice("What is 2+2?", &["3", "4", "5"], "4"),
        ],
        QuizStyle::Other => vec![
            QuizQuestion::open("Summarize the main topic of the document."),
            QuizQuestion::open("What is one key takeaway from the text?"),
        ],
    }
}
