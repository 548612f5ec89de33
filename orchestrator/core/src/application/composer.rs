// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Mission Composer
//!
//! Builds the editable view of a mission by joining its agent and task id
//! lists against the live collections, and keeps the stored mission in step
//! with edits.
//!
//! # Architecture
//!
//! - **Layer:** Application
//! - **Purpose:** Mission aggregate editing
//!
//! Missions hold opaque ids only. Resolution is a defensive join: ids with no
//! matching entity are dropped, and the surviving entities keep the mission's
//! order rather than storage order.
//!
//! Saves are full-document replaces with no concurrency token. Adding a task
//! is two writes (create the task, then save the mission) and is not rolled
//! back when the second write fails; the caller gets
//! [`ComposerError::TaskNotLinked`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::agents::AgentService;
use crate::application::errors::ComposerError;
use crate::application::missions::MissionService;
use crate::application::tasks::TaskService;
use crate::domain::agent::Agent;
use crate::domain::execution::{MissionRunReport, RunState, TaskOutput};
use crate::domain::mission::{Mission, MissionEdits, MissionId};
use crate::domain::task::{Task, TaskDraft, TaskId};
use crate::domain::validation::require;

/// Agents referenced by `mission`, in mission order. Unknown ids are dropped.
pub fn resolve_agents(mission: &Mission, all_agents: &[Agent]) -> Vec<Agent> {
    resolve(&mission.agents, all_agents, |a: &Agent| &a.id)
}

/// Tasks referenced by `mission`, in execution order. Unknown ids are dropped.
pub fn resolve_tasks(mission: &Mission, all_tasks: &[Task]) -> Vec<Task> {
    resolve(&mission.tasks, all_tasks, |t: &Task| &t.id)
}

fn resolve<K, T, F>(ids: &[K], all: &[T], key: F) -> Vec<T>
where
    K: std::hash::Hash + Eq,
    T: Clone,
    F: Fn(&T) -> &K,
{
    let index: HashMap<&K, &T> = all.iter().map(|item| (key(item), item)).collect();
    ids.iter().filter_map(|id| index.get(id).map(|item| (*item).clone())).collect()
}

/// Where an open mission view is in its edit cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    Viewing,
    /// Edits staged but not yet saved
    Editing(MissionEdits),
}

/// A mission with its references resolved, plus transient run output.
#[derive(Debug, Clone)]
pub struct MissionView {
    pub mission: Mission,
    pub agents: Vec<Agent>,
    pub tasks: Vec<Task>,
    /// Outputs of the latest run in this session; never persisted
    pub task_outputs: Vec<TaskOutput>,
    pub last_run: Option<RunState>,
    state: EditState,
}

impl MissionView {
    pub fn new(mission: Mission, all_agents: &[Agent], all_tasks: &[Task]) -> Self {
        Self {
            agents: resolve_agents(&mission, all_agents),
            tasks: resolve_tasks(&mission, all_tasks),
            mission,
            task_outputs: Vec::new(),
            last_run: None,
            state: EditState::Viewing,
        }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    /// Number of ids in the mission that did not resolve.
    pub fn orphaned_references(&self) -> usize {
        let unresolved_agents = self
            .mission
            .agents
            .iter()
            .filter(|id| !self.agents.iter().any(|a| &a.id == *id))
            .count();
        let unresolved_tasks = self
            .mission
            .tasks
            .iter()
            .filter(|id| !self.tasks.iter().any(|t| &t.id == *id))
            .count();
        unresolved_agents + unresolved_tasks
    }

    pub fn begin_edit(&mut self) {
        if !self.is_editing() {
            self.state = EditState::Editing(MissionEdits::default());
        }
    }

    /// Merges `edits` into the staged set, entering edit mode if needed.
    /// Later values win per field.
    pub fn stage(&mut self, edits: MissionEdits) {
        self.begin_edit();
        if let EditState::Editing(staged) = &mut self.state {
            merge_edits(staged, edits);
        }
    }

    pub fn cancel_edit(&mut self) {
        self.state = EditState::Viewing;
    }

    fn take_staged(&mut self) -> Option<MissionEdits> {
        match std::mem::replace(&mut self.state, EditState::Viewing) {
            EditState::Editing(edits) => Some(edits),
            EditState::Viewing => None,
        }
    }

    /// Merges a finished run: new results and this session's task outputs.
    pub fn apply_run(&mut self, report: &MissionRunReport) {
        if report.mission_id != self.mission.id {
            tracing::warn!(
                view = %self.mission.id,
                report = %report.mission_id,
                "Ignoring run report for another mission"
            );
            return;
        }
        self.mission.results = report.outcome.results.clone();
        self.task_outputs = report.outcome.task_outputs.clone();
        self.last_run = Some(report.state);
    }

    fn refresh_references(&mut self, all_agents: &[Agent], all_tasks: &[Task]) {
        self.agents = resolve_agents(&self.mission, all_agents);
        self.tasks = resolve_tasks(&self.mission, all_tasks);
    }
}

fn merge_edits(into: &mut MissionEdits, from: MissionEdits) {
    if from.name.is_some() {
        into.name = from.name;
    }
    if from.game.is_some() {
        into.game = from.game;
    }
    if from.agents.is_some() {
        into.agents = from.agents;
    }
    if from.tasks.is_some() {
        into.tasks = from.tasks;
    }
    if from.process.is_some() {
        into.process = from.process;
    }
    if from.results.is_some() {
        into.results = from.results;
    }
}

pub struct MissionComposer {
    agents: Arc<AgentService>,
    tasks: Arc<TaskService>,
    missions: Arc<MissionService>,
}

impl MissionComposer {
    pub fn new(agents: Arc<AgentService>, tasks: Arc<TaskService>, missions: Arc<MissionService>) -> Self {
        Self { agents, tasks, missions }
    }

    pub fn missions(&self) -> &MissionService {
        &self.missions
    }

    /// Loads a mission and resolves its references. Agent and task reads
    /// degrade to empty, which only hides references.
    pub async fn open(&self, mission_id: &MissionId) -> Result<MissionView, ComposerError> {
        let mission = self.load(mission_id).await?;
        let (agents, tasks) = futures::join!(self.agents.list(), self.tasks.list());

        let view = MissionView::new(mission, &agents, &tasks);
        if view.orphaned_references() > 0 {
            tracing::debug!(
                mission_id = %mission_id,
                orphans = view.orphaned_references(),
                "Mission references missing agents or tasks"
            );
        }
        Ok(view)
    }

    /// Creates the task and links it at the end of the mission.
    ///
    /// The view is updated only after both writes succeed. If the mission
    /// save fails the task still exists, unlinked.
    pub async fn add_task(&self, view: &mut MissionView, draft: TaskDraft) -> Result<Task, ComposerError> {
        let task = self.tasks.create(draft, &view.mission.game).await?;

        let mut updated = view.mission.clone();
        updated.link_task(task.id.clone());

        if let Err(e) = self.missions.save(&updated).await {
            tracing::warn!(mission_id = %updated.id, task_id = %task.id, "Task created but not linked: {}", e);
            return Err(ComposerError::TaskNotLinked {
                task_id: task.id,
                source: e,
            });
        }

        view.mission = updated;
        view.tasks.push(task.clone());
        tracing::info!(mission_id = %view.mission.id, task_id = %task.id, "Linked task to mission");
        Ok(task)
    }

    /// Unlinks the task from the mission. The task entity is kept. Returns
    /// `false` when the mission did not reference it.
    pub async fn remove_task(&self, view: &mut MissionView, task_id: &TaskId) -> Result<bool, ComposerError> {
        let mut updated = view.mission.clone();
        if !updated.unlink_task(task_id) {
            return Ok(false);
        }

        self.missions.save(&updated).await?;
        view.mission = updated;
        view.tasks.retain(|t| &t.id != task_id);
        tracing::info!(mission_id = %view.mission.id, task_id = %task_id, "Unlinked task from mission");
        Ok(true)
    }

    /// Applies `edits` to a copy of `mission` and saves the whole document.
    /// Only a rename is validated; stored fields are written back as found.
    pub async fn save(&self, mission: &Mission, edits: MissionEdits) -> Result<Mission, ComposerError> {
        if let Some(name) = &edits.name {
            require("Mission", "name", name)?;
        }
        let mut updated = mission.clone();
        updated.apply(edits);

        self.missions.save(&updated).await?;
        Ok(updated)
    }

    /// Saves the view's staged edits and returns it to viewing. A view with
    /// nothing staged is left untouched. On failure the edits stay staged.
    pub async fn commit(&self, view: &mut MissionView) -> Result<(), ComposerError> {
        let Some(edits) = view.take_staged() else {
            return Ok(());
        };

        let references_changed = edits.agents.is_some() || edits.tasks.is_some();
        match self.save(&view.mission, edits.clone()).await {
            Ok(saved) => {
                view.mission = saved;
                if references_changed {
                    let (agents, tasks) = futures::join!(self.agents.list(), self.tasks.list());
                    view.refresh_references(&agents, &tasks);
                }
                Ok(())
            }
            Err(e) => {
                view.state = EditState::Editing(edits);
                Err(e)
            }
        }
    }

    /// Replaces the stored mission's results.
    pub async fn record_results(&self, mission_id: &MissionId, results: &str) -> Result<Mission, ComposerError> {
        let mission = self.load(mission_id).await?;
        let edits = MissionEdits {
            results: Some(results.to_string()),
            ..MissionEdits::default()
        };
        self.save(&mission, edits).await
    }

    async fn load(&self, mission_id: &MissionId) -> Result<Mission, ComposerError> {
        self.missions
            .find(mission_id)
            .await?
            .ok_or_else(|| ComposerError::MissionNotFound(mission_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::{AgentDraft, AgentId};
    use crate::domain::mission::MissionDraft;

    fn agent(id: &str) -> Agent {
        AgentDraft::new(format!("role-{}", id), "g", "b").into_agent(AgentId::from(id))
    }

    fn task(id: &str) -> Task {
        TaskDraft::new(format!("task-{}", id), "d", "o", AgentId::from("a1")).into_task(TaskId::from(id), "")
    }

    fn mission(agents: &[&str], tasks: &[&str]) -> Mission {
        let mut mission = MissionDraft::new("M", "", agents.iter().map(|a| AgentId::from(*a)).collect())
            .into_mission(MissionId::from("m1"));
        for t in tasks {
            mission.link_task(TaskId::from(*t));
        }
        mission
    }

    #[test]
    fn test_resolve_tasks_keeps_mission_order() {
        let all = vec![task("t1"), task("t2"), task("t3")];
        let resolved = resolve_tasks(&mission(&[], &["t3", "t1", "t2"]), &all);
        let ids: Vec<&str> = resolved.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["t3", "t1", "t2"]);
    }

    #[test]
    fn test_resolve_drops_orphans() {
        let all = vec![agent("a1"), agent("a3")];
        let m = mission(&["gone", "a3", "also-gone", "a1"], &["x", "y"]);

        let agents = resolve_agents(&m, &all);
        let ids: Vec<&str> = agents.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a3", "a1"]);
        assert!(resolve_tasks(&m, &[]).is_empty());

        let view = MissionView::new(m, &all, &[]);
        assert_eq!(view.orphaned_references(), 4);
    }

    #[test]
    fn test_orphan_count_survives_unresolved_field_changes() {
        let mut view = MissionView::new(mission(&["a1"], &["t1"]), &[agent("a1")], &[task("t1")]);
        assert_eq!(view.orphaned_references(), 0);

        view.mission.agents.clear();
        view.mission.tasks = vec![TaskId::from("t9")];
        view.agents.push(agent("a2"));

        assert_eq!(view.orphaned_references(), 1);
    }

    #[test]
    fn test_staged_edits_merge_per_field() {
        let mut view = MissionView::new(mission(&[], &[]), &[], &[]);
        assert_eq!(view.state(), &EditState::Viewing);

        view.stage(MissionEdits { name: Some("A".into()), ..Default::default() });
        view.stage(MissionEdits { game: Some("G".into()), ..Default::default() });
        view.stage(MissionEdits { name: Some("B".into()), ..Default::default() });

        let EditState::Editing(staged) = view.state() else {
            panic!("expected editing state");
        };
        assert_eq!(staged.name.as_deref(), Some("B"));
        assert_eq!(staged.game.as_deref(), Some("G"));

        view.cancel_edit();
        assert!(!view.is_editing());
        assert_eq!(view.mission.name, "M");
    }
}
