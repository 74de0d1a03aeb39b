//! Recommendation pipeline: validate, build the prompt, call the model.

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    llm::{ChatMessage, ChatModel, ChatRequest, LlmError},
    messages::MessageKey,
    model::{Language, RecommendationRequest, RecommendationResult},
    prompt::build_prompt,
    validate::{ValidationError, validate},
};

pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounds applied to every model call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("LLM credential is not configured")]
    Configuration,

    #[error("LLM call failed: {0}")]
    Upstream(#[from] LlmError),
}

impl RecommendationError {
    pub fn http_status(&self) -> u16 {
        match self {
            RecommendationError::Validation(err) => err.http_status(),
            RecommendationError::Configuration | RecommendationError::Upstream(_) => 500,
        }
    }

    pub fn message_key(&self) -> MessageKey {
        match self {
            RecommendationError::Validation(err) => err.message_key(),
            RecommendationError::Configuration => MessageKey::ServiceUnavailable,
            RecommendationError::Upstream(_) => MessageKey::RecommendationFailed,
        }
    }
}

/// Turns raw client requests into clothing recommendations.
///
/// Holds no per-request state; one instance is shared by all handlers.
#[derive(Debug, Clone)]
pub struct RecommendationService {
    llm: Arc<dyn ChatModel>,
    settings: RecommendationSettings,
}

impl RecommendationService {
    pub fn new(llm: Arc<dyn ChatModel>, settings: RecommendationSettings) -> Self {
        Self { llm, settings }
    }

    pub fn settings(&self) -> &RecommendationSettings {
        &self.settings
    }

    /// Run the pipeline and shape the outcome for the client.
    ///
    /// Upstream error detail is logged here and replaced by a generic message.
    pub async fn get_recommendation(&self, raw: &RecommendationRequest) -> RecommendationResult {
        match self.recommend(raw).await {
            Ok(text) => RecommendationResult::Success { text },
            Err(err) => {
                let language = Language::for_messages(raw.raw_language());
                match &err {
                    RecommendationError::Validation(reason) => {
                        info!(%reason, "recommendation request rejected");
                    }
                    RecommendationError::Configuration => {
                        error!("recommendation requested but no LLM credential is configured");
                    }
                    RecommendationError::Upstream(cause) => {
                        error!(model = self.llm.model_name(), %cause, "recommendation failed");
                    }
                }
                RecommendationResult::failure(err.message_key(), err.http_status(), language)
            }
        }
    }

    /// Single attempt, no retry: a repeated call would be billed again.
    pub async fn recommend(&self, raw: &RecommendationRequest) -> Result<String, RecommendationError> {
        if !self.llm.has_credential() {
            return Err(RecommendationError::Configuration);
        }

        let input = validate(raw)?;
        debug!(
            language = %input.language,
            gender = %input.gender,
            location = %input.weather.location_name,
            "recommendation request validated"
        );

        let prompt = build_prompt(&input);
        let request = ChatRequest {
            messages: vec![ChatMessage::system(prompt.system), ChatMessage::user(prompt.user)],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let reply = tokio::time::timeout(self.settings.timeout, self.llm.complete(&request))
            .await
            .map_err(|_| LlmError::Timeout(self.settings.timeout))??;

        match reply {
            Some(text) => Ok(text),
            None => {
                warn!(model = self.llm.model_name(), "model returned no content");
                Ok(String::new())
            }
        }
    }
}
