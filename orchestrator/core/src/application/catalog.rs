// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Example-mission catalog
//!
//! Ready-made missions (agents, tasks and the mission itself) that can be
//! loaded into an empty or existing workspace. The built-in set is embedded
//! from `assets/examples.yaml`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::application::agents::AgentService;
use crate::application::errors::CatalogError;
use crate::application::missions::MissionService;
use crate::application::tasks::TaskService;
use crate::domain::agent::{AgentDraft, AgentId};
use crate::domain::mission::{Mission, MissionDraft};
use crate::domain::task::{DescriptionTemplate, TaskDraft, TaskId};
use crate::domain::validation::ValidationError;

const BUILTIN_EXAMPLES: &str = include_str!("../../assets/examples.yaml");

#[derive(Debug, Clone, Deserialize)]
pub struct ExampleMission {
    pub name: String,
    pub game: String,
    pub agents: Vec<AgentDraft>,
    pub tasks: Vec<ExampleTask>,
}

/// A task bound to one of the example's agents by role.
#[derive(Debug, Clone, Deserialize)]
pub struct ExampleTask {
    pub task: String,
    pub agent: String,
    pub description: String,
    pub expected_output: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleStatus {
    pub name: String,
    pub loaded: bool,
}

#[derive(Debug, Clone)]
pub struct LoadedExample {
    pub mission: Mission,
    pub agents_created: usize,
    pub agents_reused: usize,
    pub tasks_created: usize,
}

pub fn builtin_examples() -> Result<Vec<ExampleMission>, serde_yaml::Error> {
    serde_yaml::from_str(BUILTIN_EXAMPLES)
}

pub struct ExampleCatalog {
    examples: Vec<ExampleMission>,
    agents: Arc<AgentService>,
    tasks: Arc<TaskService>,
    missions: Arc<MissionService>,
}

impl ExampleCatalog {
    pub fn new(
        examples: Vec<ExampleMission>,
        agents: Arc<AgentService>,
        tasks: Arc<TaskService>,
        missions: Arc<MissionService>,
    ) -> Self {
        Self {
            examples,
            agents,
            tasks,
            missions,
        }
    }

    pub fn examples(&self) -> &[ExampleMission] {
        &self.examples
    }

    /// Every example with whether a mission of that name already exists.
    pub async fn list(&self) -> Vec<ExampleStatus> {
        let missions = self.missions.list().await;
        self.examples
            .iter()
            .map(|example| ExampleStatus {
                name: example.name.clone(),
                loaded: missions.iter().any(|m| m.name == example.name),
            })
            .collect()
    }

    /// Creates the example's agents, tasks and mission.
    ///
    /// Agents whose role already exists (case-insensitive) are reused rather
    /// than duplicated. Writes are not rolled back if a later step fails.
    pub async fn load(&self, name: &str) -> Result<LoadedExample, CatalogError> {
        let example = self
            .examples
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| CatalogError::UnknownExample(name.to_string()))?;

        if self.missions.find_by_name(&example.name).await?.is_some() {
            return Err(ValidationError::DuplicateMissionName(example.name.clone()).into());
        }

        let existing = self.agents.list().await;
        let mut agent_ids: HashMap<String, AgentId> = HashMap::new();
        let mut mission_agents = Vec::with_capacity(example.agents.len());
        let (mut created, mut reused) = (0, 0);

        for draft in &example.agents {
            let id = match existing.iter().find(|a| a.has_role(&draft.role)) {
                Some(agent) => {
                    tracing::debug!(role = %draft.role, agent_id = %agent.id, "Reusing existing agent");
                    reused += 1;
                    agent.id.clone()
                }
                None => {
                    created += 1;
                    self.agents.create(draft.clone()).await?.id
                }
            };
            agent_ids.insert(draft.role.to_lowercase(), id.clone());
            mission_agents.push(id);
        }

        let mut task_ids: Vec<TaskId> = Vec::with_capacity(example.tasks.len());
        for example_task in &example.tasks {
            let agent = agent_ids
                .get(&example_task.agent.to_lowercase())
                .cloned()
                .ok_or_else(|| CatalogError::InvalidExample {
                    example: example.name.clone(),
                    reason: format!("task \"{}\" names unknown agent \"{}\"", example_task.task, example_task.agent),
                })?;
            let draft = TaskDraft::new(
                example_task.task.clone(),
                DescriptionTemplate::from_text(example_task.description.clone()),
                example_task.expected_output.clone(),
                agent,
            );
            task_ids.push(self.tasks.create(draft, &example.game).await?.id);
        }

        let tasks_created = task_ids.len();
        let mission = self
            .missions
            .create(MissionDraft::new(example.name.clone(), example.game.clone(), mission_agents).with_tasks(task_ids))
            .await?;

        tracing::info!(
            example = %example.name,
            mission_id = %mission.id,
            agents_created = created,
            agents_reused = reused,
            tasks = tasks_created,
            "Loaded example mission"
        );

        Ok(LoadedExample {
            mission,
            agents_created: created,
            agents_reused: reused,
            tasks_created,
        })
    }
}
