//! LLM Client Layer - reasoning engine abstraction and chat-completions client
//!
//! This module provides:
//! - LlmClient trait, the text-in/text-out reasoning engine
//! - GroqClient for OpenAI-compatible chat endpoints
//! - MockLlmClient for scripted tests

pub mod client;
pub mod groq;
pub mod types;

pub use client::{LlmClient, MockLlmClient};
pub use groq::GroqClient;
pub use types::{ChatRequest, LlmError, Message, Role, Usage};
