//! Prompt templates for pdfquiz.
//!
//! Prompts can be customized by pointing `prompts.custom_file` at a TOML
//! file with any of the `system`, `summary` and `quiz` keys.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    /// Standing instructions for the agent.
    pub system: String,
    /// Request sent to produce a summary. Variables: `file_path`.
    pub summary: String,
    /// Request sent to produce a quiz. Variables: `file_path`, `style`.
    pub quiz: String,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            system: "You are a helpful PDF assistant. Your primary goal is to summarize PDF documents \
and generate quizzes based on their content. Always use the provided tools \
(summarize_pdf and create_quiz) when appropriate. \
When asked to generate a quiz, ensure the output is a pure JSON list of objects, \
suitable for direct parsing, and avoid conversational text around the JSON."
                .to_string(),

            summary: "Summarize the PDF located at {{file_path}}".to_string(),

            quiz: r#"Use the 'create_quiz' tool with style '{{style}}' to generate a quiz from the PDF at {{file_path}}. Return ONLY the quiz as a JSON list or a markdown JSON code block. Format: [{"question": "...", "options": [...], "answer": "..."}]"#
                .to_string(),

            variables: HashMap::new(),
        }
    }
}

impl Prompts {
    /// Load prompts, applying an optional override file and custom variables.
    pub fn load(
        custom_file: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = match custom_file {
            Some(file) => {
                let path = shellexpand::tilde(file).to_string();
                let content = std::fs::read_to_string(&path)?;
                toml::from_str(&content)?
            }
            None => Prompts::default(),
        };

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
