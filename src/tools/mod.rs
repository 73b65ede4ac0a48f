//! Tool System - adapters, registry, and the standard tool palette
//!
//! Every capability the agent can use is a [`ToolAdapter`]: a name, a
//! description shown to the reasoning engine, and a text-in/text-out call.
//! Adapters report expected failures (network, empty result, quota) as
//! `Ok` text so the engine can read them and try something else.

mod function;
mod hashtags;
mod image;
mod registry;
mod web_search;
mod wikipedia;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::llm::LlmClient;

pub use function::FnTool;
pub use hashtags::{HASHTAG_PROMPT, HashtagTool, parse_hashtag_json};
pub use image::ImageTool;
pub use registry::ToolRegistry;
pub use web_search::WebSearchTool;
pub use wikipedia::WikipediaTool;

/// A capability exposed to the agent loop
#[async_trait]
pub trait ToolAdapter: Send + Sync {
    /// Unique, non-empty name the engine uses in `Action:`
    fn name(&self) -> &str;

    /// One-line description rendered into the prompt
    fn description(&self) -> &str;

    /// Run the tool on the raw `Action Input:` text
    async fn invoke(&self, input: &str) -> std::result::Result<String, ToolError>;
}

/// Failure inside a tool adapter
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Response(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Failed(String),
}

/// Build the standard palette: web search, encyclopedia, image, hashtags.
///
/// Registration order is the order the engine sees the tools in.
pub fn standard_registry(config: &Config, llm: Arc<dyn LlmClient>) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(WebSearchTool::new(config.search.clone())?))?;
    registry.register(Arc::new(WikipediaTool::new(config.wikipedia.clone())?))?;
    registry.register(Arc::new(ImageTool::from_env(config.image.clone())?))?;
    registry.register(Arc::new(HashtagTool::new(llm)))?;
    Ok(registry)
}

/// Shared reqwest client setup for HTTP-backed tools
fn http_client(timeout_ms: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_millis(timeout_ms))
        .build()?;
    Ok(client)
}

/// Truncate to at most `max_chars` characters without splitting a code point
fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;

    #[test]
    fn test_standard_registry_order() {
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlmClient::new(Vec::<String>::new()));
        let registry = standard_registry(&Config::default(), llm).unwrap();

        let names = registry.names();
        assert_eq!(names, vec!["WebSearch", "Wikipedia", "ImageGenerator", "HashtagGenerator"]);
    }

    #[test]
    fn test_tool_error_display() {
        assert_eq!(ToolError::Failed("quota exceeded".to_string()).to_string(), "quota exceeded");
        assert_eq!(
            ToolError::InvalidInput("empty query".to_string()).to_string(),
            "invalid input: empty query"
        );
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
