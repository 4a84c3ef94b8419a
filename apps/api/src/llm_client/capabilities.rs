//! Capability traits for the model backend.
//!
//! Discovery strategies depend on these traits, never on `LlmClient` directly,
//! so each one can be driven by a scripted fake in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::LlmError;

/// JSON schema the backend must constrain its answer to.
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: Value,
    pub strict: bool,
}

/// One system/user prompt pair plus sampling options.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
    pub response_schema: Option<&'a ResponseSchema>,
}

/// A function the model may choose to invoke.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// The tool the model chose and its decoded arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    Cancelled,
    Expired,
    RequiresAction,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// True while the run has not reached a terminal state.
    pub fn is_pending(&self) -> bool {
        matches!(self, RunStatus::Queued | RunStatus::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub status: RunStatus,
    pub last_error: Option<String>,
}

/// A message in a session, newest first as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMessage {
    pub role: MessageRole,
    /// Text of the first content block, if that block is text.
    pub text: Option<String>,
}

/// Single-turn text or schema-constrained JSON completion.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError>;
}

/// Single-turn completion where the model may invoke one of `tools`.
#[async_trait]
pub trait ToolCallingBackend: Send + Sync {
    async fn complete_with_tools(
        &self,
        request: CompletionRequest<'_>,
        tools: &[ToolDefinition],
    ) -> Result<Option<ToolInvocation>, LlmError>;
}

/// Stateful multi-turn sessions run against a long-lived persona.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn create_session(&self) -> Result<String, LlmError>;

    async fn post_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<(), LlmError>;

    async fn start_run(&self, session_id: &str, persona_id: &str) -> Result<String, LlmError>;

    async fn run_status(&self, session_id: &str, run_id: &str) -> Result<RunState, LlmError>;

    async fn list_messages(&self, session_id: &str) -> Result<Vec<SessionMessage>, LlmError>;
}

/// Image generation. Failures never cross this boundary: they come back as `None`.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str, size: &str) -> Option<String>;
}
