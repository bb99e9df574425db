//! pdfquiz - PDF Summaries and Quizzes
//!
//! A small assistant that reads PDF documents, summarizes them and turns
//! them into quizzes, driven by an OpenAI-compatible chat model that calls
//! local tools.
//!
//! # Overview
//!
//! pdfquiz allows you to:
//! - Upload a PDF through a local web page and get a summary
//! - Generate a multiple-choice quiz from an uploaded document
//! - Do the same from the command line
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management and prompt templates
//! - `document` - PDF text extraction
//! - `quiz` - Quiz question model and generation
//! - `agent` - Chat model abstraction, tools and the tool-calling loop
//! - `response` - Recovery of quiz JSON from free-text answers
//! - `assistant` - Summary and quiz workflows on top of the agent
//! - `uploads` - Storage of uploaded PDFs
//!
//! # Example
//!
//! ```rust,no_run
//! use pdfquiz::assistant::Assistant;
//! use pdfquiz::config::Settings;
//! use pdfquiz::quiz::QuizStyle;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let assistant = Assistant::new(&settings)?;
//!
//!     let summary = assistant.summarize(Path::new("notes.pdf")).await?;
//!     println!("{}", summary);
//!
//!     let outcome = assistant.quiz(Path::new("notes.pdf"), QuizStyle::Mcq).await?;
//!     println!("{} questions", outcome.parsed?.len());
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod openai;
pub mod quiz;
pub mod response;
pub mod uploads;

pub use error::{PdfQuizError, Result};
