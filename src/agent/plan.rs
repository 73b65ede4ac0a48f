//! Parsing reasoning-engine output into a plan step
//!
//! Grammar, one prefix per line:
//!
//! ```text
//! Thought: ...            (optional, may span lines)
//! Action: <tool name>
//! Action Input: <input>   (may continue on following lines)
//! ```
//!
//! or
//!
//! ```text
//! Thought: ...
//! Final Answer: <answer>  (runs to the end of the text)
//! ```
//!
//! Anything else, including text with both a complete action and a final
//! answer, is malformed.

const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const FINAL_ANSWER: &str = "Final Answer:";
const OBSERVATION: &str = "Observation:";
const THOUGHT: &str = "Thought:";

/// One decision of the reasoning engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    /// Run `tool_name` on `input_text`
    ToolCall {
        thought: String,
        tool_name: String,
        input_text: String,
    },
    /// Stop with an answer
    Finish { thought: String, final_answer: String },
    /// Output that fits neither shape
    Malformed { raw_text: String },
}

impl PlanStep {
    /// Parse raw engine output
    pub fn parse(raw: &str) -> PlanStep {
        let lines: Vec<&str> = raw.lines().collect();

        let tool_call = parse_tool_call(&lines);
        let final_answer = parse_final_answer(&lines);

        match (tool_call, final_answer) {
            (Some((at, tool_name, input_text)), None) => PlanStep::ToolCall {
                thought: extract_thought(&lines[..at]),
                tool_name,
                input_text,
            },
            (None, Some((at, final_answer))) => PlanStep::Finish {
                thought: extract_thought(&lines[..at]),
                final_answer,
            },
            _ => PlanStep::Malformed {
                raw_text: raw.trim().to_string(),
            },
        }
    }

    pub fn is_finish(&self) -> bool {
        matches!(self, PlanStep::Finish { .. })
    }
}

/// `(index of Action line, tool name, input)` for the first complete action
fn parse_tool_call(lines: &[&str]) -> Option<(usize, String, String)> {
    let at = lines.iter().position(|l| l.trim_start().starts_with(ACTION))?;
    let tool_name = lines[at].trim_start()[ACTION.len()..].trim().to_string();
    if tool_name.is_empty() {
        return None;
    }

    let input_at = at + 1 + lines[at + 1..].iter().position(|l| !l.trim().is_empty())?;
    let first = lines[input_at].trim_start().strip_prefix(ACTION_INPUT)?;

    let mut input = vec![first];
    input.extend(
        lines[input_at + 1..]
            .iter()
            .take_while(|l| !l.trim_start().starts_with(OBSERVATION))
            .copied(),
    );
    let input_text = clean_input(&input.join("\n"));

    Some((at, tool_name, input_text))
}

/// `(index of Final Answer line, answer)`; the answer runs to the end
fn parse_final_answer(lines: &[&str]) -> Option<(usize, String)> {
    let at = lines.iter().position(|l| l.trim_start().starts_with(FINAL_ANSWER))?;
    let first = &lines[at].trim_start()[FINAL_ANSWER.len()..];

    let mut answer = vec![first];
    answer.extend(lines[at + 1..].iter().copied());
    Some((at, answer.join("\n").trim().to_string()))
}

fn extract_thought(lines: &[&str]) -> String {
    let text = lines.join("\n");
    let text = text.trim();
    text.strip_prefix(THOUGHT).unwrap_or(text).trim().to_string()
}

/// Trim whitespace and one level of surrounding double quotes
fn clean_input(input: &str) -> String {
    let trimmed = input.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}
