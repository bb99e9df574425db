//! Tool definitions and implementations for the agent system.

use crate::document::TextExtractor;
use crate::error::{PdfQuizError, Result};
use crate::quiz::{assemble, QuizStyle};
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Message returned by both tools when the document yields no text.
pub const EXTRACTION_FAILED: &str = "Could not extract text from PDF or PDF is empty.";

/// Number of characters the summary tool returns.
pub const SUMMARY_CHARS: usize = 1000;

/// Arguments of a single tool invocation, as sent by the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolRequest {
    pub file_path: String,
    #[serde(default)]
    pub style: Option<QuizStyle>,
}

impl ToolRequest {
    /// Parse tool-call argument JSON.
    pub fn from_arguments(arguments: &str) -> Result<Self> {
        let arguments = if arguments.trim().is_empty() { "{}" } else { arguments };
        serde_json::from_str(arguments)
            .map_err(|e| PdfQuizError::Agent(format!("Invalid tool arguments: {}", e)))
    }

    /// Requested style, defaulting to multiple choice.
    pub fn style(&self) -> QuizStyle {
        self.style.unwrap_or_default()
    }
}

/// A named operation the agent may invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call this tool.
    fn name(&self) -> &str;

    /// Description shown to the model.
    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn parameters(&self) -> serde_json::Value;

    /// Run the tool and return its result as plain text.
    async fn invoke(&self, request: ToolRequest) -> Result<String>;

    /// Chat-completion definition for this tool.
    fn definition(&self) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: self.name().to_string(),
                description: Some(self.description().to_string()),
                parameters: Some(self.parameters()),
                strict: None,
            },
        }
    }
}

/// Run the extractor on the blocking pool.
async fn extract_text(extractor: &Arc<dyn TextExtractor>, file_path: &str) -> Result<String> {
    let extractor = Arc::clone(extractor);
    let path = PathBuf::from(file_path);
    tokio::task::spawn_blocking(move || extractor.extract(&path))
        .await
        .map_err(|e| PdfQuizError::Agent(format!("Extraction task failed: {}", e)))
}

/// Returns the leading slice of a document's text as its summary.
pub struct SummarizeTool {
    extractor: Arc<dyn TextExtractor>,
}

impl SummarizeTool {
    pub fn new(extractor: Arc<dyn TextExtractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Tool for SummarizeTool {
    fn name(&self) -> &str {
        "summarize_pdf"
    }

    fn description(&self) -> &str {
        "Extracts text from a PDF and returns a placeholder summary (first 1000 characters)."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path of the PDF file on disk"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn invoke(&self, request: ToolRequest) -> Result<String> {
        info!("summarize_pdf tool called for: {}", request.file_path);

        let text = extract_text(&self.extractor, &request.file_path).await?;
        if text.is_empty() {
            return Ok(EXTRACTION_FAILED.to_string());
        }
        Ok(text.chars().take(SUMMARY_CHARS).collect())
    }
}

/// Builds a quiz for a document and returns it as a JSON array string.
pub struct CreateQuizTool {
    extractor: Arc<dyn TextExtractor>,
}

impl CreateQuizTool {
    pub fn new(extractor: Arc<dyn TextExtractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Tool for CreateQuizTool {
    fn name(&self) -> &str {
        "create_quiz"
    }

    fn description(&self) -> &str {
        "Extracts text from a PDF and generates a quiz (MCQ or open-ended style). \
        Returns a JSON list of question objects."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path of the PDF file on disk"
                },
                "style": {
                    "type": "string",
                    "description": "Quiz style: 'MCQ' for multiple choice, anything else for open-ended (default: MCQ)",
                    "default": "MCQ"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn invoke(&self, request: ToolRequest) -> Result<String> {
        let style = request.style();
        info!(
            "create_quiz tool called for: {} with style: {}",
            request.file_path, style
        );

        let text = extract_text(&self.extractor, &request.file_path).await?;
        if text.is_empty() {
            return Ok(serde_json::to_string(&json!([{ "error": EXTRACTION_FAILED }]))?);
        }

        Ok(serde_json::to_string(&assemble(&text, style))?)
    }
}

/// Tools available to the agent, looked up by name.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the summary and quiz tools over `extractor`.
    pub fn pdf_tools(extractor: Arc<dyn TextExtractor>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SummarizeTool::new(Arc::clone(&extractor))));
        registry.register(Arc::new(CreateQuizTool::new(extractor)));
        registry
    }

    /// Add a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Chat-completion definitions for every registered tool.
    pub fn definitions(&self) -> Vec<ChatCompletionTool> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    /// Look up `name`, parse `arguments` and run the tool.
    pub async fn invoke(&self, name: &str, arguments: &str) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| PdfQuizError::Agent(format!("Unknown tool: {}", name)))?;
        let request = ToolRequest::from_arguments(arguments)?;
        tool.invoke(request).await
    }
}
