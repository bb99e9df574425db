//! Configuration module for pdfquiz.
//!
//! Handles loading application settings, resolving the model endpoint
//! and managing prompt templates.

mod prompts;
mod settings;

pub use prompts::Prompts;
pub use settings::{
    GeneralSettings, ModelConfig, ModelSettings, PromptSettings, ServerSettings, Settings,
};
