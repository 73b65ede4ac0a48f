//! Prompt System - Handlebars rendering and the ReAct prompt

mod react;
mod render;

pub use react::{REACT_TEMPLATE, ReactPrompt};
pub use render::PromptRenderer;
