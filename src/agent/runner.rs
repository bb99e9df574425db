//! Agent runner with tool calling loop.

use super::model::{ChatModel, ModelReply};
use super::tools::ToolRegistry;
use crate::error::{PdfQuizError, Result};
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Default bound on model round-trips for one run.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// What a model reply asks the agent to do next.
enum Step {
    /// The model answered; the run is over.
    Finish(Option<String>),
    /// The model wants these tools run before it answers.
    CallTools(Vec<ChatCompletionMessageToolCall>),
}

impl From<ModelReply> for Step {
    fn from(reply: ModelReply) -> Self {
        if reply.tool_calls.is_empty() {
            Step::Finish(reply.content)
        } else {
            Step::CallTools(reply.tool_calls)
        }
    }
}

/// Agent that lets a chat model pick and run tools before answering.
pub struct Agent {
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    max_iterations: usize,
    system_prompt: String,
}

impl Agent {
    /// Create a new agent over `model` with the given tools and instructions.
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolRegistry, system_prompt: &str) -> Self {
        Self {
            model,
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            system_prompt: system_prompt.to_string(),
        }
    }

    /// Set maximum iterations for the agent loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Run the agent with a user task.
    #[instrument(skip(self, task), fields(model = %self.model.model_name()))]
    pub async fn run(&self, task: &str) -> Result<AgentResponse> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()
                .map_err(|e| PdfQuizError::Agent(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(task.to_string())
                .build()
                .map_err(|e| PdfQuizError::Agent(e.to_string()))?
                .into(),
        ];

        let definitions = self.tools.definitions();
        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(PdfQuizError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            let reply = self.model.complete(&messages, &definitions).await?;

            match Step::from(reply) {
                Step::Finish(content) => {
                    return Ok(AgentResponse {
                        content: content.unwrap_or_default(),
                        tool_calls: tool_calls_made,
                        iterations,
                    });
                }
                Step::CallTools(tool_calls) => {
                    let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                        .tool_calls(tool_calls.clone())
                        .build()
                        .map_err(|e| PdfQuizError::Agent(e.to_string()))?;
                    messages.push(assistant_msg.into());

                    for tool_call in &tool_calls {
                        let record = self.execute_tool_call(tool_call).await;

                        let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                            .tool_call_id(&tool_call.id)
                            .content(record.result.clone())
                            .build()
                            .map_err(|e| PdfQuizError::Agent(e.to_string()))?;
                        messages.push(tool_msg.into());

                        tool_calls_made.push(record);
                    }
                }
            }
        }
    }

    /// Execute a single tool call and return a record of it.
    ///
    /// Failures become the tool result so the model can react to them.
    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        let result = match self.tools.invoke(name, arguments).await {
            Ok(output) => output,
            Err(e) => format!("Tool error: {}", e),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::agent::tools::tests::FixedExtractor;
    use crate::agent::tools::EXTRACTION_FAILED;
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionCall};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Model that replays scripted replies and records what it was sent.
    pub(crate) struct ScriptedModel {
        replies: Mutex<VecDeque<Result<ModelReply>>>,
        pub seen: Mutex<Vec<Vec<ChatCompletionRequestMessage>>>,
    }

    impl ScriptedModel {
        pub(crate) fn new(replies: Vec<Result<ModelReply>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(
            &self,
            messages: &[ChatCompletionRequestMessage],
            _tools: &[ChatCompletionTool],
        ) -> Result<ModelReply> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(text_reply("out of script")))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    pub(crate) fn text_reply(text: &str) -> ModelReply {
        ModelReply {
            content: Some(text.to_string()),
            tool_calls: Vec::new(),
        }
    }

    pub(crate) fn tool_reply(name: &str, arguments: &str) -> ModelReply {
        ModelReply {
            content: None,
            tool_calls: vec![ChatCompletionMessageToolCall {
                id: format!("call_{}", name),
                r#type: ChatCompletionToolType::Function,
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                },
            }],
        }
    }

    fn agent(model: Arc<ScriptedModel>, text: &str) -> Agent {
        Agent::new(model, ToolRegistry::pdf_tools(FixedExtractor::new(text)), "be helpful")
    }

    #[test]
    fn test_tool_call_record_display() {
        let record = ToolCallRecord {
            name: "create_quiz".to_string(),
            arguments: r#"{"file_path": "a.pdf"}"#.to_string(),
            result: "[]".to_string(),
        };
        assert_eq!(format!("{}", record), r#"create_quiz({"file_path": "a.pdf"})"#);
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let model = ScriptedModel::new(vec![Ok(text_reply("Hello"))]);
        let response = agent(model.clone(), "doc").run("hi").await.unwrap();
        assert_eq!(response.content, "Hello");
        assert!(response.tool_calls.is_empty());
        assert_eq!(response.iterations, 1);
        assert_eq!(model.seen.lock().unwrap()[0].len(), 2);
    }

    #[tokio::test]
    async fn test_tool_result_is_fed_back() {
        let model = ScriptedModel::new(vec![
            Ok(tool_reply("summarize_pdf", r#"{"file_path": "doc.pdf"}"#)),
            Ok(text_reply("The document says: doc text")),
        ]);
        let response = agent(model.clone(), "doc text").run("summarize").await.unwrap();

        assert_eq!(response.content, "The document says: doc text");
        assert_eq!(response.iterations, 2);
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "summarize_pdf");
        assert_eq!(response.tool_calls[0].result, "doc text");

        // system, user, assistant tool call, tool result
        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[1].len(), 4);
        assert!(matches!(seen[1][3], ChatCompletionRequestMessage::Tool(_)));
    }

    #[tokio::test]
    async fn test_tool_failures_are_reported_to_model() {
        let model = ScriptedModel::new(vec![
            Ok(tool_reply("make_slides", "{}")),
            Ok(tool_reply("create_quiz", "{not json")),
            Ok(text_reply("sorry")),
        ]);
        let response = agent(model, "doc").run("quiz").await.unwrap();

        assert_eq!(response.content, "sorry");
        assert!(response.tool_calls[0].result.starts_with("Tool error: Agent error: Unknown tool"));
        assert!(response.tool_calls[1].result.contains("Invalid tool arguments"));
    }

    #[tokio::test]
    async fn test_empty_extraction_flows_through() {
        let model = ScriptedModel::new(vec![
            Ok(tool_reply("create_quiz", r#"{"file_path": "x.pdf"}"#)),
            Ok(text_reply("done")),
        ]);
        let response = agent(model, "").run("quiz").await.unwrap();
        assert!(response.tool_calls[0].result.contains(EXTRACTION_FAILED));
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        let model = ScriptedModel::new(vec![Err(PdfQuizError::OpenAI("401 Unauthorized".to_string()))]);
        let err = agent(model, "doc").run("summarize").await.unwrap_err();
        assert!(matches!(err, PdfQuizError::OpenAI(_)));
    }

    #[tokio::test]
    async fn test_iteration_limit() {
        let replies = (0..5)
            .map(|_| Ok(tool_reply("summarize_pdf", r#"{"file_path": "a.pdf"}"#)))
            .collect();
        let model = ScriptedModel::new(replies);
        let err = agent(model, "doc")
            .with_max_iterations(3)
            .run("loop forever")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("maximum iterations (3)"));
    }

    #[tokio::test]
    async fn test_missing_content_is_empty() {
        let model = ScriptedModel::new(vec![Ok(ModelReply::default())]);
        let response = agent(model, "doc").run("anything").await.unwrap();
        assert_eq!(response.content, "");
    }
}
