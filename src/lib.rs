//! Quoteloop - a tool-augmented ReAct agent
//!
//! A single agent alternates between asking a reasoning engine what to do
//! next and running the tool it picks, feeding each result back as an
//! observation until the engine gives a final answer or a budget runs out.
//! The stock tool palette finds a motivational quote, renders it as an
//! image and writes hashtags for it.

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod tools;

pub use agent::{AgentLoop, AgentState, Budget, PlanStep, RunResult, Transcript, TranscriptBuilder};
pub use error::{QuoteloopError, Result};
pub use tools::{ToolAdapter, ToolError, ToolRegistry};
