/// LLM Client: the single point of entry for all model-provider calls.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// Strategies consume the capability traits in `capabilities`; `LlmClient`
/// is the production implementation of every one of them.
///
/// Models are hardcoded to prevent drift between environments.
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod capabilities;
#[cfg(test)]
pub mod fakes;
pub mod prompts;
mod wire;

use capabilities::{
    CompletionBackend, CompletionRequest, ImageGenerator, MessageRole, RunState,
    SessionBackend, SessionMessage, ToolCallingBackend, ToolDefinition, ToolInvocation,
};
use wire::{
    ApiErrorEnvelope, ChatMessage, ChatRequest, ChatResponse, EmptyBody, FunctionSpec,
    ImageRequest, ImageResponse, JsonSchemaSpec, MessageList, NewRun, NewThreadMessage,
    ObjectId, ResponseFormat, RunObject, ToolSpec,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// The text model used for every completion, session and tool call.
pub const MODEL: &str = "gpt-4o";
/// The model used for award artwork.
pub const IMAGE_MODEL: &str = "dall-e-3";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// The single model-provider client used by the service.
/// Wraps the chat, assistants and images endpoints with one retrying sender.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sends one request and decodes the JSON answer.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, LlmError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call to {} attempt {} failed, retrying after {}ms...",
                    path,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self
                .client
                .request(method.clone(), &url)
                .bearer_auth(&self.api_key)
                .header("OpenAI-Beta", "assistants=v2");
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: api_error_message(body),
                });
            }

            let text = response.text().await?;
            return serde_json::from_str(&text).map_err(LlmError::Parse);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    async fn chat(
        &self,
        request: CompletionRequest<'_>,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatResponse, LlmError> {
        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.response_schema.map(|s| ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaSpec {
                    name: &s.name,
                    schema: &s.schema,
                    strict: s.strict,
                },
            }),
            tools: tools.map(|defs| {
                defs.iter()
                    .map(|t| ToolSpec {
                        kind: "function",
                        function: FunctionSpec {
                            name: &t.name,
                            description: &t.description,
                            parameters: &t.parameters,
                        },
                    })
                    .collect()
            }),
            tool_choice: tools.map(|_| "auto"),
        };

        let response: ChatResponse = self
            .send(Method::POST, "/chat/completions", Some(&body))
            .await?;

        if let Some(usage) = &response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        let response = self.chat(request, None).await?;
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)?;
        Ok(strip_json_fences(&text).to_string())
    }
}

#[async_trait]
impl ToolCallingBackend for LlmClient {
    async fn complete_with_tools(
        &self,
        request: CompletionRequest<'_>,
        tools: &[ToolDefinition],
    ) -> Result<Option<ToolInvocation>, LlmError> {
        let response = self.chat(request, Some(tools)).await?;
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyContent)?
            .message;

        // Only the first invocation of the turn is surfaced.
        let call = message
            .tool_calls
            .into_iter()
            .next()
            .map(|c| c.function)
            .or(message.function_call);

        match call {
            Some(call) => Ok(Some(ToolInvocation {
                arguments: serde_json::from_str(&call.arguments)?,
                name: call.name,
            })),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SessionBackend for LlmClient {
    async fn create_session(&self) -> Result<String, LlmError> {
        let thread: ObjectId = self
            .send(Method::POST, "/threads", Some(&EmptyBody {}))
            .await?;
        Ok(thread.id)
    }

    async fn post_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<(), LlmError> {
        let body = NewThreadMessage {
            role: role.as_str(),
            content,
        };
        let _: ObjectId = self
            .send(
                Method::POST,
                &format!("/threads/{session_id}/messages"),
                Some(&body),
            )
            .await?;
        Ok(())
    }

    async fn start_run(&self, session_id: &str, persona_id: &str) -> Result<String, LlmError> {
        let body = NewRun {
            assistant_id: persona_id,
        };
        let run: ObjectId = self
            .send(Method::POST, &format!("/threads/{session_id}/runs"), Some(&body))
            .await?;
        Ok(run.id)
    }

    async fn run_status(&self, session_id: &str, run_id: &str) -> Result<RunState, LlmError> {
        let run: RunObject = self
            .send(
                Method::GET,
                &format!("/threads/{session_id}/runs/{run_id}"),
                None::<&EmptyBody>,
            )
            .await?;
        Ok(RunState {
            status: run.status,
            last_error: run.last_error.map(|e| e.message),
        })
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<SessionMessage>, LlmError> {
        let list: MessageList = self
            .send(
                Method::GET,
                &format!("/threads/{session_id}/messages"),
                None::<&EmptyBody>,
            )
            .await?;
        Ok(list
            .data
            .into_iter()
            .map(|m| SessionMessage {
                role: m.role,
                text: m
                    .content
                    .into_iter()
                    .next()
                    .filter(|c| c.kind == "text")
                    .and_then(|c| c.text)
                    .map(|t| t.value),
            })
            .collect())
    }
}

#[async_trait]
impl ImageGenerator for LlmClient {
    async fn generate_image(&self, prompt: &str, size: &str) -> Option<String> {
        let body = ImageRequest {
            model: IMAGE_MODEL,
            prompt,
            size,
            quality: "standard",
            n: 1,
        };
        match self
            .send::<_, ImageResponse>(Method::POST, "/images/generations", Some(&body))
            .await
        {
            Ok(response) => response.data.into_iter().next().and_then(|d| d.url),
            Err(e) => {
                warn!("Image generation failed: {e}");
                None
            }
        }
    }
}

/// Pulls the provider's error message out of an error body, falling back to the raw body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
