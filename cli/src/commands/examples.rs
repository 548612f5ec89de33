// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Built-in example missions
//!
//! Commands: list, load

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crewdeck_core::application::CatalogError;

use crate::commands::service_error;
use crate::services::AppServices;

#[derive(Subcommand)]
pub enum ExamplesCommand {
    /// List example missions and whether they are already loaded
    List,

    /// Create an example mission with its agents and tasks
    Load {
        /// Example mission name (see `examples list`)
        #[arg(value_name = "NAME")]
        name: String,
    },
}

pub async fn handle_command(command: ExamplesCommand, services: &AppServices) -> Result<()> {
    match command {
        ExamplesCommand::List => {
            for status in services.catalog.list().await {
                let marker = if status.loaded {
                    "loaded".green()
                } else {
                    "available".dimmed()
                };
                println!("  {:<40} {}", status.name.bold(), marker);
            }
            Ok(())
        }
        ExamplesCommand::Load { name } => {
            let loaded = services.catalog.load(&name).await.map_err(|e| match e {
                CatalogError::Service(inner) => service_error(inner),
                other => other.into(),
            })?;
            println!(
                "{}",
                format!("✓ Example loaded: {} ({})", loaded.mission.name, loaded.mission.id).green()
            );
            println!(
                "  Agents: {} created, {} reused",
                loaded.agents_created, loaded.agents_reused
            );
            println!("  Tasks:  {} created", loaded.tasks_created);
            Ok(())
        }
    }
}
