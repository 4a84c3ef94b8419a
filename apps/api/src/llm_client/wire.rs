// Request and response bodies for the provider's REST API.
// Only the fields this service reads or writes are modelled.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::capabilities::{MessageRole, RunStatus};

#[derive(Debug, Serialize)]
pub(super) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolSpec<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub json_schema: JsonSchemaSpec<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct JsonSchemaSpec<'a> {
    pub name: &'a str,
    pub schema: &'a Value,
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct ToolSpec<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: FunctionSpec<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct FunctionSpec<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub parameters: &'a Value,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResponseMessage {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    /// Legacy single function-call field, still emitted by some deployments.
    pub function_call: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Deserialize)]
pub(super) struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct EmptyBody {}

#[derive(Debug, Serialize)]
pub(super) struct NewThreadMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct NewRun<'a> {
    pub assistant_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct ObjectId {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RunObject {
    pub status: RunStatus,
    pub last_error: Option<RunError>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RunError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct MessageList {
    pub data: Vec<ThreadMessage>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ThreadMessage {
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MessageContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TextValue {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ImageRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub size: &'a str,
    pub quality: &'a str,
    pub n: u8,
}

#[derive(Debug, Deserialize)]
pub(super) struct ImageResponse {
    #[serde(default)]
    pub data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ImageDatum {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    pub message: String,
}
