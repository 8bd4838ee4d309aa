//! AI completion API client
//!
//! Thin client for an OpenAI-compatible chat-completions endpoint. Keeps a
//! preconfigured `reqwest::Client` (Bearer credential, JSON content type,
//! bounded request timeout) and issues single non-streaming requests. No
//! retries; retry policy belongs to the caller, and none exists here.

use reqwest::header;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Completion client errors
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Provider throttled the request (HTTP 429)
    #[error("Provider rate limited the request")]
    RateLimited,

    /// Provider billing quota exhausted (HTTP 402)
    #[error("Provider quota exceeded")]
    QuotaExceeded,

    /// Any other non-success status from the provider
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Transport-level failure, including request timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat completion response body (only the fields we read)
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

/// Completion API client
pub struct CompletionClient {
    http_client: reqwest::Client,
    url_chat: String,
    model: String,
    max_tokens: u32,
}

impl CompletionClient {
    /// Create a client for the given endpoint and credential
    ///
    /// The endpoint must use http or https. The timeout applies per
    /// request; a timed-out request surfaces as a network error.
    pub fn new(
        endpoint: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        max_tokens: u32,
    ) -> Result<Self, CompletionError> {
        let endpoint = endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(CompletionError::Network(format!(
                "Invalid completion endpoint: {}",
                endpoint
            )));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| CompletionError::Network(format!("Invalid API key header: {}", e)))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let url_chat = format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'));

        Ok(Self {
            http_client,
            url_chat,
            model: model.to_string(),
            max_tokens,
        })
    }

    /// Request a single completion for the given prompt
    ///
    /// Returns the trimmed content of the first choice, or the empty
    /// string when the provider returns no content.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: 0.7,
        };

        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "POST {}", self.url_chat
        );

        let response = self
            .http_client
            .post(&self.url_chat)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(CompletionError::RateLimited);
        }
        if status.as_u16() == 402 {
            return Err(CompletionError::QuotaExceeded);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api(status.as_u16(), error_text));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        Ok(extract_content(&completion))
    }
}

/// Pull the first choice's content out of a completion response
fn extract_content(response: &ChatCompletionResponse) -> String {
    response
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_deref())
        .unwrap_or("")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CompletionClient::new("https://api.example.com", "sk-test", "test-model", 30, 300);
        assert!(client.is_ok());
        assert_eq!(
            client.unwrap().url_chat,
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client =
            CompletionClient::new("https://api.example.com/", "sk-test", "test-model", 30, 300)
                .unwrap();
        assert_eq!(client.url_chat, "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn test_client_rejects_bad_endpoint() {
        let client = CompletionClient::new("api.example.com", "sk-test", "test-model", 30, 300);
        assert!(matches!(client, Err(CompletionError::Network(_))));
    }

    #[test]
    fn test_request_serialization() {
        let body = ChatCompletionRequest {
            model: "test-model",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            max_tokens: 300,
            temperature: 0.7,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert_eq!(json["max_tokens"], 300);
    }

    #[test]
    fn test_extract_content_trims() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"  Thank you!  "}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(&response), "Thank you!");
    }

    #[test]
    fn test_extract_content_empty_on_no_choices() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(extract_content(&response), "");
    }

    #[test]
    fn test_extract_content_empty_on_null_content() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(extract_content(&response), "");
    }
}
