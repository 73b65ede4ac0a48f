//! HashtagGenerator tool and hashtag extraction from final answers

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use serde::Deserialize;

use super::{ToolAdapter, ToolError};
use crate::llm::LlmClient;

/// Instruction prepended to the content the hashtags are generated for
pub const HASHTAG_PROMPT: &str =
    "Based on below content create 4 to 6 best hashtags which cover wide range of public \n";

/// Asks the reasoning engine for hashtags matching some content
pub struct HashtagTool {
    llm: Arc<dyn LlmClient>,
}

impl HashtagTool {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ToolAdapter for HashtagTool {
    fn name(&self) -> &str {
        "HashtagGenerator"
    }

    fn description(&self) -> &str {
        "Generate hashtags based on selected motivational quote"
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let query = format!("{}{}", HASHTAG_PROMPT, input.trim());
        match self.llm.complete(&query).await {
            Ok(reply) => Ok(reply.trim().to_string()),
            Err(e) => {
                warn!("Hashtag generation failed: {}", e);
                Ok(format!("Hashtag generation failed: {}", e))
            }
        }
    }
}

#[derive(Deserialize)]
struct HashtagPayload {
    hashtags: Vec<String>,
}

/// Find a `{"hashtags": [...]}` object in free text (bare or inside a code fence)
pub fn parse_hashtag_json(text: &str) -> Option<Vec<String>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str::<HashtagPayload>(&text[start..=end])
        .ok()
        .map(|payload| payload.hashtags)
}
