//! Scripted chat model for tests and offline runs.

use async_trait::async_trait;
use std::{
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use super::{ChatModel, ChatRequest, LlmError};

#[derive(Debug, Clone)]
enum FakeReply {
    Text(String),
    Empty,
    Fail { status: u16, message: String },
}

/// A chat model that returns a fixed reply and records what it was asked.
#[derive(Debug)]
pub struct FakeChatModel {
    reply: FakeReply,
    credential: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatRequest>>,
}

impl FakeChatModel {
    fn new(reply: FakeReply) -> Self {
        Self {
            reply,
            credential: true,
            delay: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_reply(text: &str) -> Self {
        Self::new(FakeReply::Text(text.to_string()))
    }

    /// Succeeds without any content.
    pub fn empty() -> Self {
        Self::new(FakeReply::Empty)
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self::new(FakeReply::Fail { status, message: message.to_string() })
    }

    pub fn without_credential(mut self) -> Self {
        self.credential = false;
        self
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ChatModel for FakeChatModel {
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap_or_else(PoisonError::into_inner) = Some(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            FakeReply::Text(text) => Ok(Some(text.clone())),
            FakeReply::Empty => Ok(None),
            FakeReply::Fail { status, message } => Err(LlmError::ApiError {
                status: *status,
                message: message.clone(),
            }),
        }
    }

    fn has_credential(&self) -> bool {
        self.credential
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
