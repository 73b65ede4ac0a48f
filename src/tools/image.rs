//! ImageGenerator tool - Gemini image generation, saved as PNG
//!
//! The tool returns the path of the written file. Anything that goes wrong
//! (missing key, HTTP failure, no image in the response) comes back as text.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Local};
use log::{info, warn};
use serde_json::{Value, json};

use super::{ToolAdapter, ToolError, http_client};
use crate::config::ImageConfig;
use crate::error::Result;

const NO_IMAGE: &str = "No image returned";

/// Generate images based on a descriptive prompt
pub struct ImageTool {
    client: reqwest::Client,
    api_key: Option<String>,
    config: ImageConfig,
}

/// Parts of a generateContent response we care about
#[derive(Debug, Default, PartialEq)]
struct GeneratedContent {
    text: Option<String>,
    image: Option<Vec<u8>>,
}

impl ImageTool {
    /// Read the API key from the env var named in the config
    pub fn from_env(config: ImageConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).ok().filter(|k| !k.is_empty());
        Self::build(api_key, config)
    }

    pub fn with_api_key(api_key: impl Into<String>, config: ImageConfig) -> Result<Self> {
        Self::build(Some(api_key.into()), config)
    }

    fn build(api_key: Option<String>, config: ImageConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_ms)?,
            api_key,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn generate(&self, prompt: &str) -> std::result::Result<String, ToolError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ToolError::Failed(format!("{} not set", self.config.api_key_env)))?;

        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {"responseModalities": ["TEXT", "IMAGE"]}
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ToolError::Response(format!("Gemini API error {}: {}", status, message)));
        }

        let body: Value = response.json().await?;
        let content = parse_generated_content(&body)?;

        if let Some(text) = &content.text {
            info!("Image model text: {}", text);
        }

        match content.image {
            Some(bytes) => {
                let path = save_image(&self.config.output_dir, &bytes, Local::now()).await?;
                info!("Saved image to {}", path.display());
                Ok(path.display().to_string())
            }
            None => Ok(NO_IMAGE.to_string()),
        }
    }
}

#[async_trait]
impl ToolAdapter for ImageTool {
    fn name(&self) -> &str {
        "ImageGenerator"
    }

    fn description(&self) -> &str {
        "Generate images based on descriptive prompt"
    }

    async fn invoke(&self, input: &str) -> std::result::Result<String, ToolError> {
        let prompt = input.trim();
        if prompt.is_empty() {
            return Err(ToolError::InvalidInput("empty image prompt".to_string()));
        }

        match self.generate(prompt).await {
            Ok(output) => Ok(output),
            Err(e) => {
                warn!("Image generation failed: {}", e);
                Ok(format!("Image generation failed: {}", e))
            }
        }
    }
}

/// Collect the text parts and decode the first inline image of the first candidate
fn parse_generated_content(body: &Value) -> std::result::Result<GeneratedContent, ToolError> {
    let parts = body["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| ToolError::Response("response has no candidate content".to_string()))?;

    let mut content = GeneratedContent::default();
    for part in parts {
        if let Some(text) = part["text"].as_str() {
            let text = text.trim();
            if !text.is_empty() {
                content.text = Some(text.to_string());
            }
        } else if let Some(data) = part["inlineData"]["data"].as_str() {
            let bytes = BASE64
                .decode(data)
                .map_err(|e| ToolError::Response(format!("invalid image data: {}", e)))?;
            content.image = Some(bytes);
            break;
        }
    }

    Ok(content)
}

/// `YYYY-MM-DD-HHMM_<timestamp with non-alphanumerics as _>.png`
fn image_file_name(now: DateTime<Local>) -> String {
    let timestamp = now.format("%Y-%m-%d-%H%M").to_string();
    let snippet: String = timestamp
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(20)
        .collect();
    format!("{}_{}.png", timestamp, snippet)
}

async fn save_image(dir: &Path, bytes: &[u8], now: DateTime<Local>) -> std::result::Result<PathBuf, ToolError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(image_file_name(now));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
