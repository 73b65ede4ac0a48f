//! Configuration loading
//!
//! Every external client is built from these sections at startup and passed
//! into constructors; nothing is created at module load time. Secrets are
//! read from the environment variables named here, never stored in the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

/// Task run when none is given on the command line
pub const DEFAULT_TASK: &str = "Find one powerful motivational quote.

Then generate a high-quality image that includes the quote as the main text, styled with an inspiring visual background.

The background should be detailed and emotionally uplifting, such as a sunrise over mountains, a peaceful forest, a person climbing a cliff, or a futuristic glowing city. Use soft lighting, cinematic mood, and motivational aesthetic.

Place the quote text clearly in the center or upper half of the image using clean, readable font.
Use a color scheme that contrasts well with the background, ensuring the text is legible.
Ensure the background is slightly blurred or low-opacity to keep the focus on the text.

After generating the image, make hashtags for the motivational quote in JSON format with a \"hashtags\" key holding the list of hashtags.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub llm: LlmConfig,
    pub agent: AgentConfig,
    pub image: ImageConfig,
    pub search: SearchConfig,
    pub wikipedia: WikipediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    pub api_key_env: String,
    pub stop: Vec<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.5,
            max_tokens: 32768,
            timeout_ms: 120000,
            api_key_env: "GROQ_API_KEY".to_string(),
            stop: vec!["\nObservation".to_string()],
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_iterations: u32,
    pub max_wall_time_secs: u64,
    pub task: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 15,
            max_wall_time_secs: 300,
            task: DEFAULT_TASK.to_string(),
        }
    }
}

impl AgentConfig {
    pub fn max_wall_time(&self) -> Duration {
        Duration::from_secs(self.max_wall_time_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    pub output_dir: PathBuf,
    pub timeout_ms: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash-exp-image-generation".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            output_dir: PathBuf::from("images"),
            timeout_ms: 120000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub max_results: usize,
    pub timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            max_results: 5,
            timeout_ms: 30000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikipediaConfig {
    pub lang: String,
    pub top_k_results: usize,
    pub max_chars: usize,
    pub timeout_ms: u64,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            top_k_results: 3,
            max_chars: 4000,
            timeout_ms: 30000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            llm: LlmConfig::default(),
            agent: AgentConfig::default(),
            image: ImageConfig::default(),
            search: SearchConfig::default(),
            wikipedia: WikipediaConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
