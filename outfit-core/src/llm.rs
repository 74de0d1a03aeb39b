//! Chat-completion client abstraction.
//!
//! The recommendation service only sees [`ChatModel`], so tests can swap the
//! OpenAI-compatible client for [`FakeChatModel`].

use crate::Config;
use async_trait::async_trait;
use serde::Serialize;
use std::{fmt::Debug, sync::Arc, time::Duration};
use thiserror::Error;

pub mod fake;
pub mod openai;

pub use fake::FakeChatModel;
pub use openai::OpenAiChatModel;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to LLM provider failed: {0}")]
    RequestFailed(String),

    #[error("LLM provider returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("LLM call timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }
}

/// A single chat-completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait ChatModel: Send + Sync + Debug {
    /// Text of the first choice, or `None` when the provider returned no content.
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, LlmError>;

    /// Whether a usable credential is present. Checked before every call.
    fn has_credential(&self) -> bool;

    fn model_name(&self) -> &str;
}

/// Construct the chat model from config. Fails when no API key is configured.
pub fn chat_model_from_config(config: &Config) -> anyhow::Result<Arc<dyn ChatModel>> {
    let api_key = config.require_llm_api_key()?;

    let model = OpenAiChatModel::new(
        api_key.to_owned(),
        config.llm.model.clone(),
        config.llm.base_url.clone(),
    );

    Ok(Arc::new(model))
}
