//! Agent system for task execution with tool calling.
//!
//! A chat model decides which registered tool to run; the runner executes
//! it, feeds the result back and returns the model's final answer.

mod model;
mod runner;
mod tools;

pub use model::{ChatModel, ModelReply, OpenAIChatModel};
pub use runner::{Agent, AgentResponse, ToolCallRecord, DEFAULT_MAX_ITERATIONS};
pub use tools::{
    CreateQuizTool, SummarizeTool, Tool, ToolRegistry, ToolRequest, EXTRACTION_FAILED,
    SUMMARY_CHARS,
};

#[cfg(test)]
pub(crate) mod testing {
    pub(crate) use super::runner::tests::{text_reply, tool_reply, ScriptedModel};
    pub(crate) use super::tools::tests::FixedExtractor;
}
