//! Chat model backends for the agent.

use crate::config::ModelConfig;
use crate::error::{PdfQuizError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestMessage, ChatCompletionTool,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// One reply from the model: either final content, tool calls, or both.
#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ChatCompletionMessageToolCall>,
}

/// Trait for a chat model that may decide to call tools.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the conversation so far, offering `tools`, and return the reply.
    async fn complete(
        &self,
        messages: &[ChatCompletionRequestMessage],
        tools: &[ChatCompletionTool],
    ) -> Result<ModelReply>;

    /// Name of the underlying model.
    fn model_name(&self) -> &str;
}

/// Chat model served by an OpenAI-compatible API.
pub struct OpenAIChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIChatModel {
    /// Create a model client for the resolved endpoint.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[instrument(skip(self, messages, tools), fields(model = %self.model, messages = messages.len()))]
    async fn complete(
        &self,
        messages: &[ChatCompletionRequestMessage],
        tools: &[ChatCompletionTool],
    ) -> Result<ModelReply> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model).messages(messages.to_vec());
        if !tools.is_empty() {
            args.tools(tools.to_vec());
        }
        let request = args
            .build()
            .map_err(|e| PdfQuizError::Agent(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PdfQuizError::OpenAI(format!("Chat completion failed: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PdfQuizError::Agent("No response from model".to_string()))?;

        debug!(
            "Model replied (finish reason: {:?}, tool calls: {})",
            choice.finish_reason,
            choice.message.tool_calls.as_ref().map_or(0, Vec::len)
        );

        Ok(ModelReply {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
