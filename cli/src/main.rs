// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # crewdeck CLI
//!
//! Composes agent missions against the CRUD API and runs them on the
//! execution service.
//!
//! ## Commands
//!
//! - `crewdeck agent list|create|update|delete` - Agent management
//! - `crewdeck task list|create|delete` - Task management
//! - `crewdeck mission list|create|show|add-task|remove-task|edit|delete|run` - Missions
//! - `crewdeck examples list|load` - Built-in example missions
//! - `crewdeck config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crewdeck::commands::{self, AgentCommand, ConfigCommand, ExamplesCommand, MissionCommand, TaskCommand};
use crewdeck::services::AppServices;

/// crewdeck - compose and run multi-agent missions
#[derive(Parser)]
#[command(name = "crewdeck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, env = "CREWDECK_CONFIG_PATH", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "CREWDECK_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Agent management
    #[command(name = "agent")]
    Agent {
        #[command(subcommand)]
        command: AgentCommand,
    },

    /// Task management
    #[command(name = "task")]
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Mission composition and execution
    #[command(name = "mission")]
    Mission {
        #[command(subcommand)]
        command: MissionCommand,
    },

    /// Built-in example missions
    #[command(name = "examples")]
    Examples {
        #[command(subcommand)]
        command: ExamplesCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    // Config commands work without a valid configuration
    match cli.command {
        Commands::Config { command } => commands::config::handle_command(command, cli.config).await,
        Commands::Agent { command } => {
            commands::agent::handle_command(command, &AppServices::connect(cli.config)?).await
        }
        Commands::Task { command } => {
            commands::task::handle_command(command, &AppServices::connect(cli.config)?).await
        }
        Commands::Mission { command } => {
            commands::mission::handle_command(command, &AppServices::connect(cli.config)?).await
        }
        Commands::Examples { command } => {
            commands::examples::handle_command(command, &AppServices::connect(cli.config)?).await
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_run_arguments() {
        let cli = Cli::try_parse_from(["crewdeck", "mission", "run", "12", "--save-images", "out"]).unwrap();
        assert!(matches!(cli.command, Commands::Mission { .. }));
    }

    #[test]
    fn test_agent_tools_are_validated() {
        let ok = Cli::try_parse_from([
            "crewdeck", "agent", "create", "--role", "Artist", "--goal", "g", "--backstory", "b", "--tool",
            "ImageGenerator",
        ]);
        assert!(ok.is_ok());

        let bad = Cli::try_parse_from([
            "crewdeck", "agent", "create", "--role", "Artist", "--goal", "g", "--backstory", "b", "--tool",
            "Telepathy",
        ]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_process_values_are_restricted() {
        assert!(Cli::try_parse_from(["crewdeck", "mission", "edit", "3", "--process", "Hierarchical"]).is_ok());
        assert!(Cli::try_parse_from(["crewdeck", "mission", "edit", "3", "--process", "parallel"]).is_err());
    }
}
