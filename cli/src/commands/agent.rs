// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use crewdeck_core::domain::agent::{AgentDraft, AgentId, AgentTool};

use crate::commands::{report_delete, service_error};
use crate::services::AppServices;

#[derive(Subcommand)]
pub enum AgentCommand {
    /// List agents
    List,

    /// Create an agent
    Create {
        /// Role, unique among agents (case-insensitive)
        #[arg(long)]
        role: String,

        #[arg(long)]
        goal: String,

        #[arg(long)]
        backstory: String,

        /// Allow delegating work to other agents
        #[arg(long)]
        allow_delegation: bool,

        /// Tool to attach (ImageGenerator, CodeInterpreter); repeatable
        #[arg(long = "tool", value_name = "TOOL")]
        tools: Vec<AgentTool>,
    },

    /// Replace an agent's fields; omitted fields keep their value
    Update {
        /// Agent ID
        #[arg(value_name = "AGENT_ID")]
        id: String,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        goal: Option<String>,

        #[arg(long)]
        backstory: Option<String>,

        #[arg(long)]
        allow_delegation: Option<bool>,

        /// Replace the tool set; repeatable
        #[arg(long = "tool", value_name = "TOOL")]
        tools: Vec<AgentTool>,

        /// Remove all tools
        #[arg(long, conflicts_with = "tools")]
        clear_tools: bool,
    },

    /// Delete one or more agents
    Delete {
        #[arg(value_name = "AGENT_ID", required = true)]
        ids: Vec<String>,
    },
}

pub async fn handle_command(command: AgentCommand, services: &AppServices) -> Result<()> {
    match command {
        AgentCommand::List => list_agents(services).await,
        AgentCommand::Create {
            role,
            goal,
            backstory,
            allow_delegation,
            tools,
        } => {
            let draft = tools
                .into_iter()
                .fold(AgentDraft::new(role, goal, backstory), |draft, tool| draft.with_tool(tool))
                .with_delegation(allow_delegation);
            create_agent(draft, services).await
        }
        AgentCommand::Update {
            id,
            role,
            goal,
            backstory,
            allow_delegation,
            tools,
            clear_tools,
        } => {
            let update = AgentUpdate {
                role,
                goal,
                backstory,
                allow_delegation,
                tools: if clear_tools {
                    Some(Vec::new())
                } else if tools.is_empty() {
                    None
                } else {
                    Some(tools)
                },
            };
            update_agent(AgentId::new(id), update, services).await
        }
        AgentCommand::Delete { ids } => {
            let ids: Vec<AgentId> = ids.into_iter().map(AgentId::new).collect();
            let report = services.agents.delete_many(&ids).await;
            report_delete("agent", &report);
            Ok(())
        }
    }
}

struct AgentUpdate {
    role: Option<String>,
    goal: Option<String>,
    backstory: Option<String>,
    allow_delegation: Option<bool>,
    tools: Option<Vec<AgentTool>>,
}

async fn list_agents(services: &AppServices) -> Result<()> {
    let mut agents = services.agents.list().await;

    if agents.is_empty() {
        println!("{}", "No agents found".yellow());
        return Ok(());
    }

    agents.sort_by(|a, b| a.role.to_lowercase().cmp(&b.role.to_lowercase()));
    println!("{} agents found:", agents.len());
    println!("{:<10} {:<28} {:<10} {}", "ID", "ROLE", "DELEGATES", "TOOLS");

    for agent in agents {
        let tools: Vec<&str> = agent.tools.iter().map(|t| t.as_str()).collect();
        println!(
            "{:<10} {:<28} {:<10} {}",
            agent.id,
            agent.role.bold(),
            if agent.allow_delegation { "yes" } else { "no" },
            tools.join(", ")
        );
    }

    Ok(())
}

async fn create_agent(draft: AgentDraft, services: &AppServices) -> Result<()> {
    let agent = services.agents.create(draft).await.map_err(service_error)?;
    println!("{}", format!("✓ Agent created: {} ({})", agent.role, agent.id).green());
    Ok(())
}

async fn update_agent(id: AgentId, update: AgentUpdate, services: &AppServices) -> Result<()> {
    let mut agent = services
        .agents
        .find(&id)
        .await
        .map_err(service_error)?
        .with_context(|| format!("Agent {} not found", id))?;

    if let Some(role) = update.role {
        agent.role = role;
    }
    if let Some(goal) = update.goal {
        agent.goal = goal;
    }
    if let Some(backstory) = update.backstory {
        agent.backstory = backstory;
    }
    if let Some(allow) = update.allow_delegation {
        agent.allow_delegation = allow;
    }
    if let Some(tools) = update.tools {
        agent.tools = tools.into_iter().collect();
    }

    services.agents.update(&agent).await.map_err(service_error)?;
    println!("{}", format!("✓ Agent {} updated", agent.id).green());
    Ok(())
}
