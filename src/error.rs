//! Error types for pdfquiz.

use thiserror::Error;

/// Library-level error type for pdfquiz operations.
#[derive(Error, Debug)]
pub enum PdfQuizError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API error: {0}")]
    OpenAI(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Upload rejected: {0}")]
    Upload(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for pdfquiz operations.
pub type Result<T> = std::result::Result<T, PdfQuizError>;
