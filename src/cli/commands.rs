//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: run the agent on a task (default)
//! - tools: list the registered tools

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quoteloop - a ReAct agent that turns a task into tool calls
#[derive(Parser, Debug)]
#[command(name = "quoteloop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the agent until it answers or a budget runs out
    Run {
        /// Task text (defaults to the configured task)
        #[arg(short, long)]
        task: Option<String>,

        /// Maximum reasoning-engine calls
        #[arg(short = 'n', long)]
        max_iterations: Option<u32>,

        /// Wall-time budget in seconds
        #[arg(short = 'w', long)]
        max_wall_time: Option<u64>,

        /// Print every thought, action and observation
        #[arg(short, long)]
        show_transcript: bool,
    },

    /// List the tools available to the agent
    Tools,
}

impl Commands {
    /// The command used when none is given
    pub fn default_run() -> Self {
        Commands::Run {
            task: None,
            max_iterations: None,
            max_wall_time: None,
            show_transcript: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No args means a default run
        let cli = Cli::try_parse_from(["quoteloop"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["quoteloop", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["quoteloop", "-c", "/path/to/quoteloop.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/quoteloop.yml")));
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["quoteloop", "run"]).unwrap();
        match cli.command {
            Some(Commands::Run {
                task,
                max_iterations,
                max_wall_time,
                show_transcript,
            }) => {
                assert!(task.is_none());
                assert!(max_iterations.is_none());
                assert!(max_wall_time.is_none());
                assert!(!show_transcript);
            }
            _ => panic!("Expected run command"),
        }
    }

    #[test]
    fn test_run_with_options() {
        let cli = Cli::try_parse_from([
            "quoteloop",
            "run",
            "--task",
            "Find a quote about patience",
            "--max-iterations",
            "8",
            "--max-wall-time",
            "90",
            "--show-transcript",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Run {
                task,
                max_iterations,
                max_wall_time,
                show_transcript,
            }) => {
                assert_eq!(task.as_deref(), Some("Find a quote about patience"));
                assert_eq!(max_iterations, Some(8));
                assert_eq!(max_wall_time, Some(90));
                assert!(show_transcript);
            }
            _ => panic!("Expected run command"),
        }
    }

    #[test]
    fn test_run_short_flags() {
        let cli = Cli::try_parse_from(["quoteloop", "run", "-t", "x", "-n", "3", "-w", "10", "-s"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Run {
                max_iterations: Some(3),
                max_wall_time: Some(10),
                show_transcript: true,
                ..
            })
        ));
    }

    #[test]
    fn test_run_rejects_negative_iterations() {
        let result = Cli::try_parse_from(["quoteloop", "run", "--max-iterations", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_tools_command() {
        let cli = Cli::try_parse_from(["quoteloop", "tools"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Tools)));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["quoteloop", "tools", "-v", "-c", "alt.yml"]).unwrap();
        assert!(cli.is_verbose());
        assert_eq!(cli.config, Some(PathBuf::from("alt.yml")));
    }

    #[test]
    fn test_default_run() {
        assert!(matches!(
            Commands::default_run(),
            Commands::Run {
                task: None,
                show_transcript: false,
                ..
            }
        ));
    }

    #[test]
    fn test_help_works() {
        // Verify help doesn't panic
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["quoteloop", "--version"]);
        // Version flag causes early exit with error (expected)
        assert!(result.is_err());
    }
}
