// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crewdeck_core::domain::agent::AgentId;
use crewdeck_core::domain::task::{DescriptionTemplate, TaskDraft, TaskId};

use crate::commands::{report_delete, service_error};
use crate::services::AppServices;

#[derive(Subcommand)]
pub enum TaskCommand {
    /// List tasks
    List,

    /// Create a standalone task (use `mission add-task` to link one)
    Create {
        /// Display name
        #[arg(long)]
        task: String,

        /// Description; `{game}` is replaced by --game
        #[arg(long)]
        description: String,

        #[arg(long)]
        expected_output: String,

        /// Agent ID the task is bound to
        #[arg(long, value_name = "AGENT_ID")]
        agent: String,

        /// Scenario text substituted into the description
        #[arg(long, default_value = "")]
        game: String,
    },

    /// Delete a task. Missions referencing it keep the dangling id.
    Delete {
        #[arg(value_name = "TASK_ID")]
        id: String,
    },
}

pub async fn handle_command(command: TaskCommand, services: &AppServices) -> Result<()> {
    match command {
        TaskCommand::List => list_tasks(services).await,
        TaskCommand::Create {
            task,
            description,
            expected_output,
            agent,
            game,
        } => {
            let draft = TaskDraft::new(
                task,
                DescriptionTemplate::from_text(description),
                expected_output,
                AgentId::new(agent),
            );
            let task = services.tasks.create(draft, &game).await.map_err(service_error)?;
            println!("{}", format!("✓ Task created: {} ({})", task.task, task.id).green());
            Ok(())
        }
        TaskCommand::Delete { id } => {
            let report = services.tasks.delete(&TaskId::new(id)).await;
            report_delete("task", &report);
            Ok(())
        }
    }
}

async fn list_tasks(services: &AppServices) -> Result<()> {
    let (tasks, agents) = tokio::join!(services.tasks.list(), services.agents.list());

    if tasks.is_empty() {
        println!("{}", "No tasks found".yellow());
        return Ok(());
    }

    println!("{} tasks found:", tasks.len());
    println!("{:<10} {:<32} {}", "ID", "TASK", "AGENT");

    for task in tasks {
        let agent = agents
            .iter()
            .find(|a| a.id == task.agent)
            .map(|a| a.role.clone())
            .unwrap_or_else(|| format!("{} (missing)", task.agent).dimmed().to_string());
        println!("{:<10} {:<32} {}", task.id, task.task.bold(), agent);
    }

    Ok(())
}
