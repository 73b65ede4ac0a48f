use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use quoteloop::agent::{AgentLoop, RunResult};
use quoteloop::config::Config;
use quoteloop::llm::{GroqClient, LlmClient};
use quoteloop::tools::{parse_hashtag_json, standard_registry};

mod cli;

use cli::Cli;
use cli::commands::Commands;

/// Default Info, then the config's level, then `RUST_LOG`; later filters win
fn logger_builder(config_level: Option<&str>, env_filters: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info);
    if let Some(level) = config_level {
        builder.parse_filters(level);
    }
    if let Some(filters) = env_filters {
        builder.parse_filters(filters);
    }
    builder
}

fn setup_logging(config: &Config) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quoteloop")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("quoteloop.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let env_filters = std::env::var("RUST_LOG").ok();
    logger_builder(config.log_level.as_deref(), env_filters.as_deref())
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match cli.command.as_ref().unwrap_or(&Commands::default_run()) {
        Commands::Run {
            task,
            max_iterations,
            max_wall_time,
            show_transcript,
        } => {
            let task = task.as_deref().unwrap_or(&config.agent.task);
            let max_iterations = max_iterations.unwrap_or(config.agent.max_iterations);
            let max_wall_time = max_wall_time
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.agent.max_wall_time());
            handle_run_command(task, max_iterations, max_wall_time, *show_transcript || cli.is_verbose(), config)
                .await
        }
        Commands::Tools => handle_tools_command(config),
    }
}

async fn handle_run_command(
    task: &str,
    max_iterations: u32,
    max_wall_time: Duration,
    show_transcript: bool,
    config: &Config,
) -> Result<()> {
    let llm = Arc::new(GroqClient::from_env(config.llm.clone()).context("Failed to create reasoning engine client")?);
    if !llm.is_ready() {
        bail!("{} is not set", config.llm.api_key_env);
    }

    let registry = standard_registry(config, llm.clone()).context("Failed to build tool registry")?;
    let agent = AgentLoop::new(Arc::clone(&llm), Arc::new(registry)).context("Failed to create agent")?;

    info!(
        "Running task with {} tools, max_iterations={}, max_wall_time={:?}",
        agent.registry().len(),
        max_iterations,
        max_wall_time
    );
    println!("{} {}", "Model:".cyan(), llm.model());

    let result = agent
        .run(task, max_iterations, max_wall_time)
        .await
        .context("Agent run failed")?;

    if show_transcript {
        print_transcript(&result);
    }
    print_outcome(&result);

    let usage = llm.total_usage();
    info!(
        "Token usage: input={}, output={}, total={}",
        usage.input_tokens,
        usage.output_tokens,
        usage.total()
    );
    Ok(())
}

fn handle_tools_command(config: &Config) -> Result<()> {
    let llm: Arc<dyn LlmClient> =
        Arc::new(GroqClient::from_env(config.llm.clone()).context("Failed to create reasoning engine client")?);
    let registry = standard_registry(config, llm).context("Failed to build tool registry")?;

    for (name, description) in registry.describe_all() {
        println!("{}: {}", name.green(), description);
    }
    Ok(())
}

fn print_transcript(result: &RunResult) {
    for (i, entry) in result.transcript.entries().iter().enumerate() {
        println!("{} {}", format!("[{}]", i + 1).dimmed(), "Thought:".bold());
        if !entry.thought.is_empty() {
            println!("    {}", entry.thought);
        }
        if let Some(action) = &entry.action {
            println!("    {} {} {}", "Action:".cyan(), action.tool, format!("({})", action.input).dimmed());
        }
        if let Some(observation) = &entry.observation {
            println!("    {} {}", "Observation:".yellow(), observation);
        }
    }
}

fn print_outcome(result: &RunResult) {
    if result.is_finished() {
        println!(
            "{} {}/{} iterations",
            "Finished:".green().bold(),
            result.iterations_used,
            result.max_iterations
        );
        println!("{}", result.final_answer);
    } else {
        let budget = result
            .exhausted
            .map(|b| format!("{:?}", b).to_lowercase())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{} {} budget exhausted after {} iterations",
            "Stopped:".red().bold(),
            budget,
            result.iterations_used
        );
        println!("{} {}", "Last observation:".yellow(), result.final_answer);
    }

    if let Some(hashtags) = parse_hashtag_json(&result.final_answer) {
        println!("{} {}", "Hashtags:".cyan(), hashtags.join(" "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration; it decides the log level
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
