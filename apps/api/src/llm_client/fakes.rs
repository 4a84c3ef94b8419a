//! Scripted in-memory backends for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::capabilities::{
    CompletionBackend, CompletionRequest, ImageGenerator, MessageRole, RunState, RunStatus,
    SessionBackend, SessionMessage, ToolCallingBackend, ToolDefinition, ToolInvocation,
};
use crate::llm_client::LlmError;

pub fn api_error(message: &str) -> LlmError {
    LlmError::Api {
        status: 500,
        message: message.to_string(),
    }
}

/// A prompt as the fake saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub had_schema: bool,
}

impl From<&CompletionRequest<'_>> for RecordedRequest {
    fn from(request: &CompletionRequest<'_>) -> Self {
        Self {
            system: request.system.to_string(),
            user: request.user.to_string(),
            temperature: request.temperature,
            had_schema: request.response_schema.is_some(),
        }
    }
}

/// Answers each `complete` call with the next scripted reply.
/// Runs out of script ⇒ `EmptyContent`.
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    pub requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing(message: &str) -> Self {
        Self::new(vec![Err(api_error(message))])
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedCompletion {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push((&request).into());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// Returns one scripted tool invocation (or failure).
pub struct ScriptedTools {
    reply: Mutex<Option<Result<Option<ToolInvocation>, LlmError>>>,
    pub offered: Mutex<Vec<String>>,
}

impl ScriptedTools {
    pub fn new(reply: Result<Option<ToolInvocation>, LlmError>) -> Self {
        Self {
            reply: Mutex::new(Some(reply)),
            offered: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ToolCallingBackend for ScriptedTools {
    async fn complete_with_tools(
        &self,
        _request: CompletionRequest<'_>,
        tools: &[ToolDefinition],
    ) -> Result<Option<ToolInvocation>, LlmError> {
        self.offered
            .lock()
            .unwrap()
            .extend(tools.iter().map(|t| t.name.clone()));
        self.reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// A session backend that reports the scripted run statuses in order, then
/// repeats the last one forever.
pub struct ScriptedSession {
    statuses: Mutex<VecDeque<RunState>>,
    messages: Vec<SessionMessage>,
    fail_create: Option<String>,
    pub polls: Mutex<u32>,
    pub posted: Mutex<Vec<String>>,
}

impl ScriptedSession {
    pub fn new(statuses: Vec<RunStatus>, messages: Vec<SessionMessage>) -> Self {
        Self {
            statuses: Mutex::new(
                statuses
                    .into_iter()
                    .map(|status| RunState {
                        status,
                        last_error: None,
                    })
                    .collect(),
            ),
            messages,
            fail_create: None,
            polls: Mutex::new(0),
            posted: Mutex::new(Vec::new()),
        }
    }

    pub fn completing_with(reply: &str) -> Self {
        Self::new(
            vec![RunStatus::Queued, RunStatus::InProgress, RunStatus::Completed],
            vec![
                SessionMessage {
                    role: MessageRole::Assistant,
                    text: Some(reply.to_string()),
                },
                SessionMessage {
                    role: MessageRole::User,
                    text: Some("research prompt".to_string()),
                },
            ],
        )
    }

    pub fn failing_run(message: &str) -> Self {
        let session = Self::new(vec![], vec![]);
        *session.statuses.lock().unwrap() = VecDeque::from(vec![RunState {
            status: RunStatus::Failed,
            last_error: Some(message.to_string()),
        }]);
        session
    }

    pub fn unreachable(message: &str) -> Self {
        let mut session = Self::new(vec![], vec![]);
        session.fail_create = Some(message.to_string());
        session
    }

    pub fn poll_count(&self) -> u32 {
        *self.polls.lock().unwrap()
    }
}

#[async_trait]
impl SessionBackend for ScriptedSession {
    async fn create_session(&self) -> Result<String, LlmError> {
        match &self.fail_create {
            Some(message) => Err(api_error(message)),
            None => Ok("thread_1".to_string()),
        }
    }

    async fn post_message(
        &self,
        _session_id: &str,
        _role: MessageRole,
        content: &str,
    ) -> Result<(), LlmError> {
        self.posted.lock().unwrap().push(content.to_string());
        Ok(())
    }

    async fn start_run(&self, _session_id: &str, _persona_id: &str) -> Result<String, LlmError> {
        Ok("run_1".to_string())
    }

    async fn run_status(&self, _session_id: &str, _run_id: &str) -> Result<RunState, LlmError> {
        *self.polls.lock().unwrap() += 1;
        let mut statuses = self.statuses.lock().unwrap();
        let state = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        };
        Ok(state.unwrap_or(RunState {
            status: RunStatus::InProgress,
            last_error: None,
        }))
    }

    async fn list_messages(&self, _session_id: &str) -> Result<Vec<SessionMessage>, LlmError> {
        Ok(self.messages.clone())
    }
}

/// Returns a URL per call, or `None` for the call indices listed in `failing`.
pub struct ScriptedImages {
    failing: Vec<usize>,
    calls: Mutex<usize>,
}

impl ScriptedImages {
    pub fn new(failing: Vec<usize>) -> Self {
        Self {
            failing,
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ImageGenerator for ScriptedImages {
    async fn generate_image(&self, _prompt: &str, _size: &str) -> Option<String> {
        let mut calls = self.calls.lock().unwrap();
        let index = *calls;
        *calls += 1;
        if self.failing.contains(&index) {
            None
        } else {
            Some(format!("https://images.example.com/{index}.png"))
        }
    }
}
