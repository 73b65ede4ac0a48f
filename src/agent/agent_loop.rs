//! Agent loop - think, act, observe until a final answer or a budget runs out.
//!
//! Each iteration renders the full prompt (task, tool palette, scratchpad),
//! makes exactly one reasoning-engine call and acts on the parsed step.
//! Unknown tools, tool errors, tool panics and unparsable output all become
//! observations so the engine can correct itself on the next iteration.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use serde::Serialize;
use tokio::time::Instant;

use super::plan::PlanStep;
use super::transcript::{Action, Transcript, TranscriptBuilder};
use crate::config::AgentConfig;
use crate::error::{QuoteloopError, Result};
use crate::llm::LlmClient;
use crate::prompt::ReactPrompt;
use crate::tools::ToolRegistry;

/// Observation recorded when engine output cannot be parsed
pub const PARSE_CORRECTION: &str =
    "Could not parse output; follow the Thought/Action/Action Input/Final Answer format.";

/// Final answer of a run that ends with an empty transcript
pub const NO_ANSWER: &str = "no answer reached";

/// Where the loop's state machine is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgentState {
    Thinking,
    Acting,
    Finished,
    Failed,
}

impl AgentState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentState::Finished | AgentState::Failed)
    }
}

/// The budget that stopped a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Budget {
    Iterations,
    WallTime,
}

/// Outcome of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub final_answer: String,
    pub transcript: Transcript,
    /// Reasoning-engine calls made, including the one that finished
    pub iterations_used: u32,
    pub max_iterations: u32,
    /// `Finished`, or `Failed` for a soft failure
    pub state: AgentState,
    /// Set when a budget ended the run
    pub exhausted: Option<Budget>,
}

impl RunResult {
    pub fn is_finished(&self) -> bool {
        self.state == AgentState::Finished
    }

    /// The run stopped on a budget rather than a final answer
    pub fn is_soft_failure(&self) -> bool {
        self.state == AgentState::Failed
    }
}

/// Single-agent ReAct loop over a shared tool registry.
///
/// `run` takes `&self`; independent runs can share one `AgentLoop`.
pub struct AgentLoop<L: LlmClient + ?Sized = dyn LlmClient> {
    llm: Arc<L>,
    registry: Arc<ToolRegistry>,
    prompt: ReactPrompt,
}

impl<L: LlmClient + ?Sized> AgentLoop<L> {
    /// Create a loop with the built-in ReAct prompt
    pub fn new(llm: Arc<L>, registry: Arc<ToolRegistry>) -> Result<Self> {
        Ok(Self::with_prompt(llm, registry, ReactPrompt::new()?))
    }

    pub fn with_prompt(llm: Arc<L>, registry: Arc<ToolRegistry>, prompt: ReactPrompt) -> Self {
        Self { llm, registry, prompt }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run with the budgets from config
    pub async fn run_with_config(&self, task: &str, config: &AgentConfig) -> Result<RunResult> {
        self.run(task, config.max_iterations, config.max_wall_time()).await
    }

    /// Drive the engine until it gives a final answer or a budget runs out.
    ///
    /// Budget exhaustion is returned as a soft-failure `RunResult`, not an
    /// error. Errors are reserved for a zero iteration budget, template
    /// failures and reasoning-engine transport failures.
    pub async fn run(&self, task: &str, max_iterations: u32, max_wall_time: Duration) -> Result<RunResult> {
        if max_iterations == 0 {
            return Err(QuoteloopError::InvalidArgument(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        let started = Instant::now();
        let tools = self.registry.describe_all();
        let mut transcript = TranscriptBuilder::new();
        let mut state = AgentState::Thinking;
        let mut iterations: u32 = 0;

        tracing::info!(
            model = self.llm.model(),
            max_iterations,
            max_wall_time_ms = millis(max_wall_time),
            tools = tools.len(),
            "Agent run started"
        );

        let exhausted = loop {
            if iterations >= max_iterations {
                break Budget::Iterations;
            }
            if started.elapsed() >= max_wall_time {
                break Budget::WallTime;
            }

            let prompt = self.prompt.render(task, &tools, &transcript.scratchpad())?;
            let raw = self.llm.complete(&prompt).await?;
            iterations += 1;

            match PlanStep::parse(&raw) {
                PlanStep::Finish { final_answer, .. } => {
                    transition(&mut state, AgentState::Finished, iterations);
                    tracing::info!(iterations, "Agent reached a final answer");
                    return Ok(RunResult {
                        final_answer,
                        transcript: transcript.finish(),
                        iterations_used: iterations,
                        max_iterations,
                        state,
                        exhausted: None,
                    });
                }
                PlanStep::ToolCall {
                    thought,
                    tool_name,
                    input_text,
                } => {
                    transition(&mut state, AgentState::Acting, iterations);
                    let observation = self.act(&tool_name, &input_text).await;
                    transcript.record_action(
                        thought,
                        Action {
                            tool: tool_name,
                            input: input_text,
                        },
                        observation,
                    );
                    transition(&mut state, AgentState::Thinking, iterations);
                }
                PlanStep::Malformed { raw_text } => {
                    tracing::warn!(iterations, raw_len = raw_text.len(), "Could not parse engine output");
                    transcript.record_malformed(raw_text, PARSE_CORRECTION);
                }
            }
        };

        transition(&mut state, AgentState::Failed, iterations);
        tracing::warn!(
            iterations,
            budget = ?exhausted,
            elapsed_ms = millis(started.elapsed()),
            "Agent stopped without a final answer"
        );

        let transcript = transcript.finish();
        let final_answer = transcript.last_observation().unwrap_or(NO_ANSWER).to_string();

        Ok(RunResult {
            final_answer,
            transcript,
            iterations_used: iterations,
            max_iterations,
            state,
            exhausted: Some(exhausted),
        })
    }

    /// Execute one tool call; every failure mode comes back as observation text
    async fn act(&self, tool_name: &str, input: &str) -> String {
        let tool = match self.registry.get(tool_name) {
            Ok(tool) => tool,
            Err(e) => {
                tracing::warn!(tool = tool_name, "Engine requested an unknown tool");
                return e.to_string();
            }
        };

        let started = Instant::now();
        let observation = match AssertUnwindSafe(tool.invoke(input)).catch_unwind().await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => QuoteloopError::ToolExecution {
                tool: tool_name.to_string(),
                message: e.to_string(),
            }
            .to_string(),
            Err(payload) => QuoteloopError::ToolExecution {
                tool: tool_name.to_string(),
                message: format!("panicked: {}", panic_message(payload.as_ref())),
            }
            .to_string(),
        };

        tracing::debug!(
            tool = tool_name,
            elapsed_ms = millis(started.elapsed()),
            observation_len = observation.len(),
            "Tool call finished"
        );
        observation
    }
}

fn transition(state: &mut AgentState, next: AgentState, iteration: u32) {
    tracing::debug!(from = ?*state, to = ?next, iteration, "Agent state change");
    *state = next;
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
