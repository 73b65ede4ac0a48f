//! Closure-backed tool adapter

use async_trait::async_trait;

use super::{ToolAdapter, ToolError};

type ToolFn = dyn Fn(&str) -> Result<String, ToolError> + Send + Sync;

/// Wraps a plain function as a tool. Handy for local utilities and tests.
pub struct FnTool {
    name: String,
    description: String,
    func: Box<ToolFn>,
}

impl FnTool {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            func: Box::new(func),
        }
    }
}

#[async_trait]
impl ToolAdapter for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        (self.func)(input)
    }
}
