//! Groq chat-completions client
//!
//! Speaks the OpenAI-compatible `/chat/completions` protocol, so any endpoint
//! with that shape works by changing `base_url` in the config.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::config::LlmConfig;
use crate::llm::client::LlmClient;
use crate::llm::types::{ChatRequest, LlmError, Message, Usage};

/// Retry delay assumed when a 429 carries no usable `retry-after` header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Chat-completions client for Groq and compatible endpoints
pub struct GroqClient {
    client: Client,
    api_key: Option<String>,
    config: LlmConfig,
    usage: Arc<Mutex<Usage>>,
}

impl GroqClient {
    /// Create a client, reading the API key from the env var named in the config.
    ///
    /// A missing key is not an error here; `is_ready` reports it and every
    /// `complete` call fails with `MissingApiKey`.
    pub fn from_env(config: LlmConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env).ok().filter(|k| !k.is_empty());
        Self::build(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: impl Into<String>, config: LlmConfig) -> Result<Self, LlmError> {
        Self::build(Some(api_key.into()), config)
    }

    fn build(api_key: Option<String>, config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            api_key,
            config,
            usage: Arc::new(Mutex::new(Usage::default())),
        })
    }

    /// Build the request body for a single-prompt completion
    fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![Message::user(prompt)],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stop: self.config.stop.clone(),
        }
    }

    /// Pull the assistant text and token usage out of a response body
    fn parse_response(body: &Value) -> Result<(String, Usage), LlmError> {
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::InvalidResponse("missing choices[0].message.content".to_string()))?
            .to_string();

        let usage = body
            .get("usage")
            .map(|u| {
                Usage::new(
                    u["prompt_tokens"].as_u64().unwrap_or(0),
                    u["completion_tokens"].as_u64().unwrap_or(0),
                )
            })
            .unwrap_or_default();

        Ok((content, usage))
    }

    /// Send a request to the chat-completions endpoint
    async fn send_request(&self, api_key: &str, request: &ChatRequest) -> Result<Value, LlmError> {
        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Get cumulative token usage
    pub fn total_usage(&self) -> Usage {
        self.usage.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| LlmError::MissingApiKey {
            env_var: self.config.api_key_env.clone(),
        })?;

        let request = self.build_request(prompt);
        debug!("Sending {} prompt chars to {}", prompt.len(), self.config.model);

        let body = self.send_request(api_key, &request).await?;
        let (content, usage) = Self::parse_response(&body)?;

        debug!(
            "Completion used {} input / {} output tokens",
            usage.input_tokens, usage.output_tokens
        );
        if let Ok(mut total) = self.usage.lock() {
            total.add(&usage);
        }

        Ok(content)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_ready(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .field("ready", &self.api_key.is_some())
            .finish()
    }
}
