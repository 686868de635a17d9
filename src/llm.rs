//! Language model client (OpenAI-compatible chat completions)

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::LlmConfig;
use crate::error::ProviderError;

const MAX_LOG_CHARS: usize = 2_000;

/// Something that completes a single user prompt
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Chat-completions client
pub struct OpenAiClient {
    client: ClientWithMiddleware,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: Option<f32>,
}

impl OpenAiClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &LlmConfig) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull the first choice's text out of a chat-completions body
fn parse_chat_response(body: &str) -> Result<String, ProviderError> {
    let parsed: ChatResponse = serde_json::from_str(body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Response("Missing choices".to_string()))?
        .message
        .content
        .ok_or_else(|| ProviderError::Response("Empty message content".to_string()))
}

fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let char_count = input.chars().count();
    if char_count <= max_chars {
        return input.to_string();
    }
    let mut preview: String = input.chars().take(max_chars).collect();
    preview.push_str(&format!("... [truncated, total_chars={char_count}]"));
    preview
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    #[instrument(name = "llm_complete", skip_all)]
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        debug!(model = %self.model, prompt = %truncate_for_log(prompt, MAX_LOG_CHARS), "sending prompt");

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_string(&body)?);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let content = parse_chat_response(&text)?;
        debug!(output = %truncate_for_log(&content, MAX_LOG_CHARS), "model replied");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_response_takes_first_choice() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "first"}},
                {"index": 1, "message": {"role": "assistant", "content": "second"}}
            ]
        }"#;
        assert_eq!(parse_chat_response(body).unwrap(), "first");
    }

    #[test]
    fn test_parse_chat_response_without_choices() {
        let err = parse_chat_response(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, ProviderError::Response(_)));
    }

    #[test]
    fn test_parse_chat_response_null_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        assert!(matches!(
            parse_chat_response(body),
            Err(ProviderError::Response(_))
        ));
    }

    #[test]
    fn test_parse_chat_response_invalid_json() {
        assert!(matches!(
            parse_chat_response("<html>bad gateway</html>"),
            Err(ProviderError::Decode(_))
        ));
    }

    #[test]
    fn test_request_serialization_omits_unset_temperature() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["messages"][0]["role"], "user");
        assert!(value.get("temperature").is_none());
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 10), "short");
        let long = "a".repeat(20);
        let preview = truncate_for_log(&long, 5);
        assert!(preview.starts_with("aaaaa..."));
        assert!(preview.contains("total_chars=20"));
    }
}
