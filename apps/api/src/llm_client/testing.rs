//! Scripted `ChatCompletion` backend for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatCompletion, ChatRequest, LlmError};

/// Replays queued replies in order and records every request it receives.
#[derive(Default)]
pub struct ScriptedChat {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, status: u16, message: &str) -> Self {
        self.replies.lock().unwrap().push_back(Err(LlmError::Api {
            status,
            message: message.to_string(),
        }));
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for ScriptedChat {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}
