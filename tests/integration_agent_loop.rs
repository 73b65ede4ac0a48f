//! Agent loop integration tests
//!
//! Drives whole runs through the public API with a scripted engine and
//! in-process tools. No test touches the network.

use std::sync::Arc;
use std::time::Duration;

use quoteloop::agent::{AgentLoop, AgentState, Budget};
use quoteloop::config::Config;
use quoteloop::error::Result;
use quoteloop::llm::{LlmClient, MockLlmClient};
use quoteloop::tools::{FnTool, HashtagTool, ToolError, ToolRegistry, parse_hashtag_json, standard_registry};
use tempfile::TempDir;

const BUDGET: Duration = Duration::from_secs(30);

fn echo_registry() -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(FnTool::new("Echo", "Repeat the input", |input| {
        Ok(input.to_string())
    })))?;
    Ok(registry)
}

/// Integration test: one tool call then a final answer
#[tokio::test]
async fn test_echo_round_trip() -> Result<()> {
    let mock = Arc::new(MockLlmClient::new([
        "Thought: I should echo.\nAction: Echo\nAction Input: hi",
        "Thought: I now know the final answer\nFinal Answer: hi",
    ]));
    let agent = AgentLoop::new(mock.clone(), Arc::new(echo_registry()?))?;

    let result = agent.run("Say hi", 5, BUDGET).await?;

    assert_eq!(result.final_answer, "hi");
    assert_eq!(result.iterations_used, 2);
    assert_eq!(result.state, AgentState::Finished);
    assert_eq!(result.transcript.len(), 1);

    let entry = &result.transcript.entries()[0];
    assert_eq!(entry.thought, "I should echo.");
    assert_eq!(entry.action.as_ref().map(|a| a.tool.as_str()), Some("Echo"));
    assert_eq!(entry.observation.as_deref(), Some("hi"));
    Ok(())
}

/// Integration test: the quote workflow with stand-in search and image tools
#[tokio::test]
async fn test_quote_workflow() -> Result<()> {
    let images = TempDir::new()?;
    let image_dir = images.path().to_path_buf();

    // The engine drives the loop and also answers the hashtag tool's prompt
    let mock = Arc::new(MockLlmClient::new([
        "Thought: find a quote\nAction: WebSearch\nAction Input: powerful motivational quote",
        "Thought: render it\nAction: ImageGenerator\nAction Input: \"Fall seven times, stand up eight.\" over a sunrise",
        "Thought: hashtags next\nAction: HashtagGenerator\nAction Input: Fall seven times, stand up eight.",
        "#Resilience #NeverGiveUp #Motivation #RiseUp",
        "Thought: I now know the final answer\nFinal Answer: {\"hashtags\": [\"#Resilience\", \"#NeverGiveUp\", \"#Motivation\", \"#RiseUp\"]}",
    ]));

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(FnTool::new("WebSearch", "Search the web for research", |_| {
        Ok("Fall seven times, stand up eight. - Japanese proverb".to_string())
    })))?;
    registry.register(Arc::new(FnTool::new(
        "ImageGenerator",
        "Generate images based on descriptive prompt",
        move |prompt| {
            let path = image_dir.join("quote.png");
            std::fs::write(&path, prompt.as_bytes()).map_err(ToolError::from)?;
            Ok(path.display().to_string())
        },
    )))?;
    let engine: Arc<dyn LlmClient> = mock.clone();
    registry.register(Arc::new(HashtagTool::new(engine)))?;

    let agent = AgentLoop::new(mock.clone(), Arc::new(registry))?;
    let result = agent.run("Make a motivational post", 10, BUDGET).await?;

    assert!(result.is_finished());
    assert_eq!(result.iterations_used, 4);
    assert_eq!(mock.call_count(), 5);
    assert!(images.path().join("quote.png").exists());

    let observations: Vec<_> = result
        .transcript
        .entries()
        .iter()
        .filter_map(|e| e.observation.as_deref())
        .collect();
    assert_eq!(observations[2], "#Resilience #NeverGiveUp #Motivation #RiseUp");

    let hashtags = parse_hashtag_json(&result.final_answer).unwrap();
    assert_eq!(hashtags.len(), 4);
    assert_eq!(hashtags[0], "#Resilience");
    Ok(())
}

/// Integration test: independent runs share one loop and registry
#[tokio::test]
async fn test_concurrent_runs_share_registry() -> Result<()> {
    let registry = Arc::new(echo_registry()?);
    let fast = AgentLoop::new(Arc::new(MockLlmClient::repeating("Final Answer: fast")), registry.clone())?;
    let slow = AgentLoop::new(
        Arc::new(MockLlmClient::new(["Action: Echo\nAction Input: one", "Final Answer: slow"])),
        registry.clone(),
    )?;

    let (a, b, c) = tokio::join!(
        fast.run("a", 3, BUDGET),
        slow.run("b", 3, BUDGET),
        fast.run("c", 3, BUDGET),
    );

    assert_eq!(a?.final_answer, "fast");
    assert_eq!(b?.final_answer, "slow");
    assert_eq!(c?.final_answer, "fast");
    assert_eq!(registry.len(), 1);
    Ok(())
}

/// Integration test: a looping engine hits the iteration budget
#[tokio::test]
async fn test_iteration_budget_soft_failure() -> Result<()> {
    let mock = Arc::new(MockLlmClient::repeating("Action: Echo\nAction Input: again"));
    let agent = AgentLoop::new(mock, Arc::new(echo_registry()?))?;

    let result = agent.run("never ends", 3, BUDGET).await?;

    assert!(result.is_soft_failure());
    assert_eq!(result.exhausted, Some(Budget::Iterations));
    assert_eq!(result.iterations_used, 3);
    assert_eq!(result.final_answer, "again");
    Ok(())
}

/// Integration test: results serialize for callers that want to keep them
#[tokio::test]
async fn test_run_result_serializes() -> Result<()> {
    let mock = Arc::new(MockLlmClient::new(["Action: Echo\nAction Input: x", "Final Answer: x"]));
    let agent = AgentLoop::new(mock, Arc::new(echo_registry()?))?;
    let result = agent.run("t", 2, BUDGET).await?;

    let json = serde_json::to_value(&result)?;
    assert_eq!(json["state"], "Finished");
    assert_eq!(json["iterations_used"], 2);
    assert!(json["exhausted"].is_null());
    assert_eq!(json["transcript"]["entries"][0]["action"]["tool"], "Echo");
    Ok(())
}

/// Integration test: the standard palette in registration order
#[test]
fn test_standard_registry_order() -> Result<()> {
    let config = Config::default();
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlmClient::new(Vec::<String>::new()));
    let registry = standard_registry(&config, llm)?;

    assert_eq!(
        registry.names(),
        vec!["WebSearch", "Wikipedia", "ImageGenerator", "HashtagGenerator"]
    );
    for (name, description) in registry.describe_all() {
        assert!(!name.is_empty());
        assert!(!description.is_empty());
    }
    Ok(())
}
