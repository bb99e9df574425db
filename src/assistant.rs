//! The PDF assistant: one agent, two requests.
//!
//! Wires configuration, prompts, the text extractor and the tool registry
//! into an [`Agent`], then phrases the summary and quiz requests for it.

use crate::agent::{Agent, AgentResponse, ChatModel, OpenAIChatModel, ToolRegistry};
use crate::config::{Prompts, Settings};
use crate::document::{PdfTextExtractor, TextExtractor};
use crate::error::Result;
use crate::quiz::{QuizQuestion, QuizStyle};
use crate::response::{parse_quiz, ParseError};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Outcome of a quiz request whose agent call succeeded.
#[derive(Debug)]
pub struct QuizOutcome {
    /// The agent's final text, untouched.
    pub raw: String,
    /// Questions recovered from `raw`, or why that failed.
    pub parsed: std::result::Result<Vec<QuizQuestion>, ParseError>,
    /// Tool calls the agent made on the way.
    pub response: AgentResponse,
}

/// Summary and quiz front end over a tool-calling agent.
pub struct Assistant {
    agent: Agent,
    prompts: Prompts,
}

impl Assistant {
    /// Build the assistant from settings.
    ///
    /// Fails when the model endpoint is not fully configured.
    pub fn new(settings: &Settings) -> Result<Self> {
        let model_config = settings.model_config()?;
        let prompts = Prompts::load(
            settings.prompts.custom_file.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        info!(
            "Using model {} at {}",
            model_config.model,
            model_config.base_url.as_str()
        );

        let model: Arc<dyn ChatModel> = Arc::new(OpenAIChatModel::new(&model_config)?);
        let extractor: Arc<dyn TextExtractor> = Arc::new(PdfTextExtractor::new());

        Ok(Self::with_model(model, extractor, prompts).with_max_iterations(model_config.max_iterations))
    }

    /// Build the assistant from explicit parts.
    pub fn with_model(
        model: Arc<dyn ChatModel>,
        extractor: Arc<dyn TextExtractor>,
        prompts: Prompts,
    ) -> Self {
        let agent = Agent::new(model, ToolRegistry::pdf_tools(extractor), &prompts.system);
        Self { agent, prompts }
    }

    fn with_max_iterations(mut self, max: usize) -> Self {
        self.agent = self.agent.with_max_iterations(max);
        self
    }

    /// Ask the agent to summarize the PDF at `path`.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn summarize(&self, path: &Path) -> Result<String> {
        let prompt = self.render(&self.prompts.summary, path, None);
        let response = self.agent.run(&prompt).await?;
        Ok(response.content)
    }

    /// Ask the agent for a quiz on the PDF at `path` and parse the answer.
    ///
    /// Agent failures are errors; parse failures are reported in the outcome.
    #[instrument(skip(self), fields(path = %path.display(), style = %style))]
    pub async fn quiz(&self, path: &Path, style: QuizStyle) -> Result<QuizOutcome> {
        let prompt = self.render(&self.prompts.quiz, path, Some(style));
        let response = self.agent.run(&prompt).await?;
        let raw = response.content.clone();
        let parsed = parse_quiz(&raw);

        if let Err(e) = &parsed {
            info!("Quiz answer could not be parsed: {}", e);
        }

        Ok(QuizOutcome {
            raw,
            parsed,
            response,
        })
    }

    fn render(&self, template: &str, path: &Path, style: Option<QuizStyle>) -> String {
        let mut vars = HashMap::new();
        vars.insert("file_path".to_string(), path.display().to_string());
        if let Some(style) = style {
            vars.insert("style".to_string(), style.to_string());
        }
        self.prompts.render_with_custom(template, &vars)
    }
}
