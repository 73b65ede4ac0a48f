//! Run transcript and its rendering as a ReAct scratchpad

use serde::Serialize;

/// A tool invocation requested by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub tool: String,
    pub input: String,
}

/// One think/act/observe step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub thought: String,
    pub action: Option<Action>,
    pub observation: Option<String>,
}

/// Ordered, append-only history of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent observation, skipping entries that have none
    pub fn last_observation(&self) -> Option<&str> {
        self.entries.iter().rev().find_map(|e| e.observation.as_deref())
    }
}

/// Accumulates a run's transcript and renders it for the next prompt
#[derive(Debug, Default)]
pub struct TranscriptBuilder {
    transcript: Transcript,
}

impl TranscriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tool call and what it returned
    pub fn record_action(&mut self, thought: impl Into<String>, action: Action, observation: impl Into<String>) {
        self.transcript.entries.push(TranscriptEntry {
            thought: thought.into(),
            action: Some(action),
            observation: Some(observation.into()),
        });
    }

    /// Record output that could not be parsed, with the corrective observation
    pub fn record_malformed(&mut self, raw_text: impl Into<String>, correction: impl Into<String>) {
        self.transcript.entries.push(TranscriptEntry {
            thought: raw_text.into(),
            action: None,
            observation: Some(correction.into()),
        });
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Render the history so it continues a prompt ending in `Thought:`
    pub fn scratchpad(&self) -> String {
        let mut pad = String::new();
        for entry in &self.transcript.entries {
            if !entry.thought.is_empty() {
                pad.push(' ');
                pad.push_str(&entry.thought);
            }
            pad.push('\n');
            if let Some(action) = &entry.action {
                pad.push_str(&format!("Action: {}\nAction Input: {}\n", action.tool, action.input));
            }
            if let Some(observation) = &entry.observation {
                pad.push_str(&format!("Observation: {}\n", observation));
            }
            pad.push_str("Thought:");
        }
        pad
    }

    pub fn finish(self) -> Transcript {
        self.transcript
    }
}
