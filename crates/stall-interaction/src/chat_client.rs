//! Minimal client for an OpenAI-compatible `/chat/completions` endpoint.
//!
//! Works against the hosted API as well as local servers (LM Studio,
//! llama.cpp, vLLM) that speak the same protocol. One request per call, no
//! retries.

use std::env;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use stall_core::config::LlmConfig;
use stall_core::error::{Result, StallError};

/// Chat completions client bound to one model.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
}

impl ChatClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:1234/v1`).
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: None,
            model: model.into(),
            temperature: 0.3,
        }
    }

    /// Builds a client from the `[llm]` config section.
    ///
    /// The API key is read from the environment variable named by
    /// `api_key_env`; local servers usually need none.
    ///
    /// # Errors
    ///
    /// Returns `StallError::Config` if the HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| StallError::config(format!("Failed to build HTTP client: {}", e)))?;
        let api_key = env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::debug!(
                "[ChatClient] {} not set, sending requests without a key",
                config.api_key_env
            );
        }

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
            model: config.model.clone(),
            temperature: 0.3,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Sends one system + user exchange and returns the reply text.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
        };

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| StallError::llm(format!("Chat request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| StallError::llm(format!("Failed to parse chat response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| StallError::llm("Chat API returned no content"))
}

fn map_http_error(status: StatusCode, body: &str) -> StallError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());
    StallError::llm(format!("HTTP {}: {}", status.as_u16(), message))
}
