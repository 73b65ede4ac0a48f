//! Ordered, uniquely-named tool registry

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use super::ToolAdapter;
use crate::error::{QuoteloopError, Result};

/// Tools keyed by name, kept in registration order.
///
/// Built once at startup and shared read-only (behind `Arc`) by every run,
/// so concurrent lookups need no locking.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolAdapter>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool; its name must be non-empty and not already registered
    pub fn register(&mut self, tool: Arc<dyn ToolAdapter>) -> Result<()> {
        let name = tool.name().to_string();
        if name.trim().is_empty() {
            return Err(QuoteloopError::InvalidToolName(name));
        }
        if self.index.contains_key(&name) {
            return Err(QuoteloopError::DuplicateTool(name));
        }

        debug!("Registered tool {} at position {}", name, self.tools.len());
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by exact name
    pub fn get(&self, name: &str) -> Result<Arc<dyn ToolAdapter>> {
        self.index
            .get(name)
            .map(|&i| Arc::clone(&self.tools[i]))
            .ok_or_else(|| QuoteloopError::UnknownTool {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// `(name, description)` pairs in registration order
    pub fn describe_all(&self) -> Vec<(String, String)> {
        self.tools
            .iter()
            .map(|t| (t.name().to_string(), t.description().to_string()))
            .collect()
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.names()).finish()
    }
}
