//! Reasoning engine trait and a scripted mock

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::types::LlmError;

/// Text-in, text-out reasoning engine.
///
/// One call is one full round trip; there is no streaming contract. Each
/// call is independent, so the caller supplies the whole context every time.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete a prompt, blocking until the full response is available
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier used for logging
    fn model(&self) -> &str;

    /// Whether the client has what it needs to make calls
    fn is_ready(&self) -> bool {
        true
    }
}

/// Mock client that replays a fixed script of responses and records every
/// prompt it receives.
///
/// Once the script is used up the `repeat` response is returned, if set;
/// otherwise the call fails with `InvalidResponse`.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    responses: Mutex<VecDeque<String>>,
    repeat: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    /// Create a mock that answers with `responses` in order
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            repeat: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always answers with the same response
    pub fn repeating(response: impl Into<String>) -> Self {
        Self {
            repeat: Some(response.into()),
            ..Default::default()
        }
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Number of completed calls
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let next = self.responses.lock().ok().and_then(|mut r| r.pop_front());
        match next.or_else(|| self.repeat.clone()) {
            Some(response) => Ok(response),
            None => Err(LlmError::InvalidResponse("mock script exhausted".to_string())),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let mock = MockLlmClient::new(["first", "second"]);
        assert_eq!(mock.complete("a").await.unwrap(), "first");
        assert_eq!(mock.complete("b").await.unwrap(), "second");
        assert!(mock.complete("c").await.is_err());
        assert_eq!(mock.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_mock_repeating() {
        let mock = MockLlmClient::repeating("again");
        for _ in 0..3 {
            assert_eq!(mock.complete("p").await.unwrap(), "again");
        }
        assert_eq!(mock.call_count(), 3);
    }

    #[test]
    fn test_mock_identity() {
        let mock = MockLlmClient::new(Vec::<String>::new());
        assert!(mock.is_ready());
        assert_eq!(mock.model(), "mock-model");
    }
}
