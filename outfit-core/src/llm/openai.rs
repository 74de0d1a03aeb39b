use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, ChatModel, ChatRequest, LlmError};
use crate::http::truncate_body;

/// Client for OpenAI-compatible `/chat/completions` endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiChatModel {
    api_key: String,
    model: String,
    base_url: String,
    http: Client,
}

impl OpenAiChatModel {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url,
            http: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct OaRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OaMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OaChoice {
    message: Option<OaMessage>,
}

#[derive(Debug, Deserialize)]
struct OaResponse {
    #[serde(default)]
    choices: Vec<OaChoice>,
}

#[derive(Debug, Deserialize)]
struct OaApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct OaErrorResponse {
    error: OaApiError,
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, LlmError> {
        let body = OaRequest {
            model: &self.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let res = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        parse_completion(&text)
    }

    fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// First choice's content; empty content counts as absent.
fn parse_completion(body: &str) -> Result<Option<String>, LlmError> {
    let parsed: OaResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ParseError(e.to_string()))?;

    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty()))
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<OaErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => truncate_body(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_matches_chat_completions_shape() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hello")];
        let body = OaRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            max_tokens: 500,
            temperature: 0.5,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "hello" }
                ],
                "max_tokens": 500,
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn parses_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Wear a coat."}},
                      {"message":{"role":"assistant","content":"ignored"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), Some("Wear a coat.".to_string()));
    }

    #[test]
    fn missing_or_empty_content_is_none() {
        assert_eq!(parse_completion(r#"{"choices":[]}"#).unwrap(), None);
        assert_eq!(parse_completion(r#"{}"#).unwrap(), None);
        assert_eq!(
            parse_completion(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap(),
            None
        );
        assert_eq!(
            parse_completion(r#"{"choices":[{"message":{"content":""}}]}"#).unwrap(),
            None
        );
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = parse_completion("<html>").unwrap_err();
        assert!(matches!(err, LlmError::ParseError(_)));
    }

    #[test]
    fn error_message_prefers_provider_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Incorrect API key provided");

        let long = "x".repeat(500);
        assert_eq!(error_message(&long).len(), 203);
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let model = OpenAiChatModel::new(
            "KEY".into(),
            "gpt-3.5-turbo".into(),
            "https://api.openai.com/v1/".into(),
        );
        assert_eq!(model.endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn blank_key_is_not_a_credential() {
        let model = OpenAiChatModel::new("  ".into(), "m".into(), "http://localhost".into());
        assert!(!model.has_credential());
    }
}
