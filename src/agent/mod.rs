//! Agent module - the ReAct tool-use loop.
//!
//! - PlanStep parsing of reasoning-engine output
//! - Transcript and TranscriptBuilder for the scratchpad
//! - AgentLoop, the bounded think/act/observe state machine

mod agent_loop;
mod plan;
mod transcript;

pub use agent_loop::{AgentLoop, AgentState, Budget, NO_ANSWER, PARSE_CORRECTION, RunResult};
pub use plan::PlanStep;
pub use transcript::{Action, Transcript, TranscriptBuilder, TranscriptEntry};
