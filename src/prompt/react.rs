//! ReAct prompt: tool palette, format instructions, task and scratchpad

use serde::Serialize;

use super::render::PromptRenderer;
use crate::error::Result;

const REACT_TEMPLATE_NAME: &str = "react";

/// Default ReAct prompt. `agent_scratchpad` continues the trailing `Thought:`.
pub const REACT_TEMPLATE: &str = "Answer the following questions as best you can. You have access to the following tools:

{{tools}}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{{tool_names}}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

Begin!

Question: {{input}}
Thought:{{agent_scratchpad}}";

#[derive(Serialize)]
struct ReactContext<'a> {
    tools: String,
    tool_names: String,
    input: &'a str,
    agent_scratchpad: &'a str,
}

/// Builds the full prompt sent to the reasoning engine each iteration
pub struct ReactPrompt {
    renderer: PromptRenderer,
}

impl ReactPrompt {
    /// Prompt using the built-in template
    pub fn new() -> Result<Self> {
        Self::with_template(REACT_TEMPLATE)
    }

    /// Prompt using a custom template with the same variables
    pub fn with_template(template: &str) -> Result<Self> {
        let mut renderer = PromptRenderer::new();
        renderer.register_template(REACT_TEMPLATE_NAME, template)?;
        Ok(Self { renderer })
    }

    /// Render the prompt; `tools` is `(name, description)` in registration order
    pub fn render(&self, task: &str, tools: &[(String, String)], scratchpad: &str) -> Result<String> {
        let context = ReactContext {
            tools: tools
                .iter()
                .map(|(name, description)| format!("{}: {}", name, description))
                .collect::<Vec<_>>()
                .join("\n"),
            tool_names: tools.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>().join(", "),
            input: task,
            agent_scratchpad: scratchpad,
        };

        self.renderer.render_named(REACT_TEMPLATE_NAME, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools() -> Vec<(String, String)> {
        vec![
            ("WebSearch".to_string(), "Search the web for research".to_string()),
            ("Wikipedia".to_string(), "Get factual information".to_string()),
        ]
    }

    #[test]
    fn test_render_lists_tools_in_order() {
        let prompt = ReactPrompt::new().unwrap();
        let rendered = prompt.render("Find a quote", &tools(), "").unwrap();

        assert!(rendered.contains("WebSearch: Search the web for research\nWikipedia: Get factual information"));
        assert!(rendered.contains("should be one of [WebSearch, Wikipedia]"));
        assert!(rendered.contains("Question: Find a quote\n"));
        assert!(rendered.ends_with("Thought:"));
    }

    #[test]
    fn test_render_appends_scratchpad() {
        let prompt = ReactPrompt::new().unwrap();
        let scratchpad = " look it up\nAction: Wikipedia\nAction Input: Seneca\nObservation: Roman\nThought:";
        let rendered = prompt.render("Who?", &tools(), scratchpad).unwrap();

        assert!(rendered.ends_with(&format!("Thought:{}", scratchpad)));
    }

    #[test]
    fn test_render_with_no_tools() {
        let prompt = ReactPrompt::new().unwrap();
        let rendered = prompt.render("Just answer", &[], "").unwrap();
        assert!(rendered.contains("should be one of []"));
    }

    #[test]
    fn test_custom_template() {
        let prompt = ReactPrompt::with_template("{{tool_names}}|{{input}}|{{agent_scratchpad}}").unwrap();
        let rendered = prompt.render("task", &tools(), "pad").unwrap();
        assert_eq!(rendered, "WebSearch, Wikipedia|task|pad");
    }
}
