// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Mission commands
//!
//! Commands: list, create, show, add-task, remove-task, edit, delete, run

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crewdeck_core::application::MissionView;
use crewdeck_core::domain::agent::AgentId;
use crewdeck_core::domain::execution::{ImageFormat, MissionRunReport, RunState, TaskOutput};
use crewdeck_core::domain::mission::{MissionDraft, MissionEdits, MissionId, ProcessMode};
use crewdeck_core::domain::task::{DescriptionTemplate, TaskDraft, TaskId};

use crate::commands::{report_delete, service_error};
use crate::services::AppServices;

#[derive(Subcommand)]
pub enum MissionCommand {
    /// List missions
    List,

    /// Create a mission (sequential, no tasks)
    Create {
        /// Name, unique among missions
        #[arg(long)]
        name: String,

        /// Scenario the task descriptions are written against
        #[arg(long, default_value = "")]
        game: String,

        /// Agent ID; repeatable
        #[arg(long = "agent", value_name = "AGENT_ID")]
        agents: Vec<String>,
    },

    /// Show a mission with its agents, tasks and results
    Show {
        #[arg(value_name = "MISSION_ID")]
        id: String,
    },

    /// Create a task and append it to the mission
    AddTask {
        #[arg(value_name = "MISSION_ID")]
        mission: String,

        #[arg(long)]
        task: String,

        /// Description; `{game}` is replaced by the mission's scenario
        #[arg(long)]
        description: String,

        #[arg(long)]
        expected_output: String,

        #[arg(long, value_name = "AGENT_ID")]
        agent: String,
    },

    /// Unlink a task from the mission (the task itself is kept)
    RemoveTask {
        #[arg(value_name = "MISSION_ID")]
        mission: String,

        #[arg(value_name = "TASK_ID")]
        task: String,
    },

    /// Edit mission fields and save the whole mission
    Edit {
        #[arg(value_name = "MISSION_ID")]
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        game: Option<String>,

        /// Replace the agent list; repeatable
        #[arg(long = "agent", value_name = "AGENT_ID")]
        agents: Vec<String>,

        /// Replace the task order; repeatable
        #[arg(long = "task", value_name = "TASK_ID")]
        tasks: Vec<String>,

        #[arg(long, value_parser = ["sequential", "hierarchical"], ignore_case = true)]
        process: Option<String>,

        /// Clear stored results
        #[arg(long)]
        clear_results: bool,
    },

    /// Delete one or more missions (their tasks and agents are kept)
    Delete {
        #[arg(value_name = "MISSION_ID", required = true)]
        ids: Vec<String>,
    },

    /// Run the mission on the execution service
    Run {
        #[arg(value_name = "MISSION_ID")]
        id: String,

        /// Write image outputs to this directory
        #[arg(long, value_name = "DIR")]
        save_images: Option<PathBuf>,
    },
}

pub async fn handle_command(command: MissionCommand, services: &AppServices) -> Result<()> {
    match command {
        MissionCommand::List => list_missions(services).await,
        MissionCommand::Create { name, game, agents } => {
            let draft = MissionDraft::new(name, game, agents.into_iter().map(AgentId::new).collect());
            let mission = services.missions.create(draft).await.map_err(service_error)?;
            println!("{}", format!("✓ Mission created: {} ({})", mission.name, mission.id).green());
            Ok(())
        }
        MissionCommand::Show { id } => {
            let view = services.composer.open(&MissionId::new(id)).await?;
            print_view(&view);
            Ok(())
        }
        MissionCommand::AddTask {
            mission,
            task,
            description,
            expected_output,
            agent,
        } => {
            let mut view = services.composer.open(&MissionId::new(mission)).await?;
            let draft = TaskDraft::new(
                task,
                DescriptionTemplate::from_text(description),
                expected_output,
                AgentId::new(agent),
            );
            let task = services.composer.add_task(&mut view, draft).await?;
            println!(
                "{}",
                format!("✓ Task {} added as step {} of {}", task.id, view.mission.tasks.len(), view.mission.name).green()
            );
            Ok(())
        }
        MissionCommand::RemoveTask { mission, task } => {
            let mut view = services.composer.open(&MissionId::new(mission)).await?;
            let task = TaskId::new(task);
            if services.composer.remove_task(&mut view, &task).await? {
                println!("{}", format!("✓ Task {} removed from {}", task, view.mission.name).green());
            } else {
                println!("{}", format!("Task {} is not part of {}", task, view.mission.name).yellow());
            }
            Ok(())
        }
        MissionCommand::Edit {
            id,
            name,
            game,
            agents,
            tasks,
            process,
            clear_results,
        } => {
            let edits = MissionEdits {
                name,
                game,
                agents: (!agents.is_empty()).then(|| agents.into_iter().map(AgentId::new).collect()),
                tasks: (!tasks.is_empty()).then(|| tasks.into_iter().map(TaskId::new).collect()),
                process: process.as_deref().map(ProcessMode::from_wire),
                results: clear_results.then(String::new),
            };
            if edits.is_empty() {
                println!("{}", "Nothing to change".yellow());
                return Ok(());
            }

            let mut view = services.composer.open(&MissionId::new(id)).await?;
            view.stage(edits);
            services.composer.commit(&mut view).await?;
            println!("{}", format!("✓ Mission {} saved", view.mission.id).green());
            Ok(())
        }
        MissionCommand::Delete { ids } => {
            let ids: Vec<MissionId> = ids.into_iter().map(MissionId::new).collect();
            let report = services.missions.delete_many(&ids).await;
            report_delete("mission", &report);
            Ok(())
        }
        MissionCommand::Run { id, save_images } => run_mission(MissionId::new(id), save_images, services).await,
    }
}

async fn list_missions(services: &AppServices) -> Result<()> {
    let missions = services.missions.list().await;

    if missions.is_empty() {
        println!("{}", "No missions found".yellow());
        return Ok(());
    }

    println!("{} missions found:", missions.len());
    println!("{:<10} {:<40} {:<13} {:<6} {}", "ID", "NAME", "PROCESS", "TASKS", "RESULTS");

    for mission in missions {
        println!(
            "{:<10} {:<40} {:<13} {:<6} {}",
            mission.id,
            mission.name.bold(),
            mission.process,
            mission.tasks.len(),
            if mission.has_results() { "yes" } else { "-" }
        );
    }

    Ok(())
}

fn print_view(view: &MissionView) {
    let mission = &view.mission;
    println!("{} {}", mission.name.bold(), format!("({})", mission.id).dimmed());
    println!("  Process: {}", mission.process);
    if !mission.game.is_empty() {
        println!("  Scenario: {}", mission.game);
    }
    println!();

    println!("{}", "Agents:".bold());
    for agent in &view.agents {
        println!("  {:<10} {}", agent.id, agent.role);
    }
    println!();

    println!("{}", "Tasks:".bold());
    for (step, task) in view.tasks.iter().enumerate() {
        let role = view
            .agents
            .iter()
            .find(|a| a.id == task.agent)
            .map(|a| a.role.as_str())
            .unwrap_or("?");
        println!("  {}. {} {} {}", step + 1, task.task.bold(), format!("[{}]", task.id).dimmed(), role);
    }
    if view.orphaned_references() > 0 {
        println!(
            "{}",
            format!("  {} referenced agents or tasks no longer exist", view.orphaned_references()).dimmed()
        );
    }
    println!();

    println!("{}", "Results:".bold());
    println!("{}", mission.results_or_placeholder());
}

async fn run_mission(id: MissionId, save_images: Option<PathBuf>, services: &AppServices) -> Result<()> {
    println!(
        "Running mission {} (timeout {}s)...",
        id,
        services.orchestrator.budget().as_secs()
    );

    let report = services.orchestrator.run(&id).await;
    print_report(&report);

    if let Some(dir) = save_images {
        let saved = save_image_outputs(&report, &dir)?;
        if saved > 0 {
            println!("{}", format!("✓ {} image(s) written to {}", saved, dir.display()).green());
        }
    }

    if !report.persisted {
        println!("{}", "⚠ Results could not be saved to the mission".yellow());
    }
    Ok(())
}

fn print_report(report: &MissionRunReport) {
    let state = match report.state {
        RunState::Completed => report.state.to_string().green(),
        RunState::TimedOut => report.state.to_string().yellow(),
        _ => report.state.to_string().red(),
    };
    println!("Run {} in {:.1}s", state, report.outcome.execution_time);
    println!();
    println!("{}", report.outcome.results);

    for (index, output) in report.outcome.task_outputs.iter().enumerate() {
        println!();
        println!("{}", format!("Task output {}:", index + 1).bold());
        match output {
            TaskOutput::Text(text) => println!("{}", text),
            TaskOutput::Image(data) => println!("{}", format!("[image, {} base64 chars]", data.len()).dimmed()),
        }
    }
}

fn save_image_outputs(report: &MissionRunReport, dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;

    let mut saved = 0;
    for (index, output) in report.outcome.task_outputs.iter().enumerate() {
        if !output.is_image() {
            continue;
        }
        let Some(bytes) = output.decode_image() else {
            tracing::warn!(output = index + 1, "Image output is not valid base64, skipping");
            continue;
        };
        let extension = ImageFormat::sniff(output.data()).extension();
        let path = dir.join(format!("mission-{}-output-{}.{}", report.mission_id, index + 1, extension));
        std::fs::write(&path, bytes).with_context(|| format!("Failed to write {:?}", path))?;
        saved += 1;
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewdeck_core::domain::execution::ExecutionOutcome;

    #[test]
    fn test_only_decodable_images_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let report = MissionRunReport {
            mission_id: MissionId::from("7"),
            state: RunState::Completed,
            outcome: ExecutionOutcome {
                results: "done".into(),
                task_outputs: vec![
                    TaskOutput::Text("aGVsbG8=".into()),
                    TaskOutput::Image("/9j/aGVsbG8=".into()),
                    TaskOutput::Image("%%%".into()),
                ],
                execution_time: 1.0,
            },
            persisted: true,
        };

        let saved = save_image_outputs(&report, dir.path()).unwrap();

        assert_eq!(saved, 1);
        assert!(dir.path().join("mission-7-output-2.jpg").exists());
    }
}
