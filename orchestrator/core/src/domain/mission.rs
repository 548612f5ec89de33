// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Mission Aggregate
//!
//! An ordered pipeline of tasks over a set of agents. The mission stores only
//! ids; resolving them into live [`Agent`](crate::domain::agent::Agent) and
//! [`Task`](crate::domain::task::Task) values is a defensive join performed
//! by the Mission Composer, which drops ids that no longer resolve.
//!
//! ## Invariants
//!
//! - `tasks` order is execution order.
//! - `name` is unique among missions (checked client-side before create).
//! - References are not checked on write; orphans are tolerated on read.
//! - `results` holds the latest aggregated result text (or nothing).

use serde::{Deserialize, Serialize};

use crate::domain::agent::AgentId;
use crate::domain::task::TaskId;

/// Shown in place of an empty `results` field.
pub const NO_RESULTS_PLACEHOLDER: &str = "// No results yet";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionId(pub String);

impl MissionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MissionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// How the execution service orders task execution. Only the value is
/// stored here; `Hierarchical` is interpreted by the execution service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProcessMode {
    #[default]
    Sequential,
    Hierarchical,
}

impl ProcessMode {
    /// Parses a stored process value. Anything other than a case-insensitive
    /// `hierarchical` runs sequentially, which is how the execution service
    /// reads the field.
    pub fn from_wire(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("hierarchical") {
            ProcessMode::Hierarchical
        } else {
            ProcessMode::Sequential
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessMode::Sequential => "Sequential",
            ProcessMode::Hierarchical => "Hierarchical",
        }
    }
}

impl std::fmt::Display for ProcessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub name: String,
    /// Free-text scenario the task descriptions are written against
    pub game: String,
    pub agents: Vec<AgentId>,
    pub tasks: Vec<TaskId>,
    pub process: ProcessMode,
    pub results: String,
}

impl Mission {
    pub fn has_results(&self) -> bool {
        !self.results.trim().is_empty()
    }

    /// Results text for display, with a placeholder when nothing ran yet.
    pub fn results_or_placeholder(&self) -> &str {
        if self.has_results() {
            &self.results
        } else {
            NO_RESULTS_PLACEHOLDER
        }
    }

    /// Appends a task reference at the end of the pipeline.
    pub fn link_task(&mut self, task_id: TaskId) {
        self.tasks.push(task_id);
    }

    /// Removes every reference to `task_id`. Returns whether anything changed.
    pub fn unlink_task(&mut self, task_id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t != task_id);
        self.tasks.len() != before
    }

    pub fn apply(&mut self, edits: MissionEdits) {
        if let Some(name) = edits.name {
            self.name = name;
        }
        if let Some(game) = edits.game {
            self.game = game;
        }
        if let Some(agents) = edits.agents {
            self.agents = agents;
        }
        if let Some(tasks) = edits.tasks {
            self.tasks = tasks;
        }
        if let Some(process) = edits.process {
            self.process = process;
        }
        if let Some(results) = edits.results {
            self.results = results;
        }
    }
}

/// Everything needed to create a mission except its id. New missions start
/// sequential with no results, and with no tasks unless some are given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionDraft {
    pub name: String,
    pub game: String,
    pub agents: Vec<AgentId>,
    pub tasks: Vec<TaskId>,
}

impl MissionDraft {
    pub fn new(name: impl Into<String>, game: impl Into<String>, agents: Vec<AgentId>) -> Self {
        Self {
            name: name.into(),
            game: game.into(),
            agents,
            tasks: Vec::new(),
        }
    }

    /// Tasks already created for this mission, in execution order.
    pub fn with_tasks(mut self, tasks: Vec<TaskId>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn into_mission(self, id: MissionId) -> Mission {
        Mission {
            id,
            name: self.name,
            game: self.game,
            agents: self.agents,
            tasks: self.tasks,
            process: ProcessMode::Sequential,
            results: String::new(),
        }
    }
}

/// Field-level edits applied before a full-document save. `None` keeps the
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionEdits {
    pub name: Option<String>,
    pub game: Option<String>,
    pub agents: Option<Vec<AgentId>>,
    pub tasks: Option<Vec<TaskId>>,
    pub process: Option<ProcessMode>,
    pub results: Option<String>,
}

impl MissionEdits {
    pub fn is_empty(&self) -> bool {
        *self == MissionEdits::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission() -> Mission {
        MissionDraft::new("Newsletter", "AI startup", vec![AgentId::from("a1")])
            .into_mission(MissionId::from("m1"))
    }

    #[test]
    fn test_new_mission_defaults() {
        let m = mission();
        assert_eq!(m.process, ProcessMode::Sequential);
        assert!(m.tasks.is_empty());
        assert!(!m.has_results());
        assert_eq!(m.results_or_placeholder(), NO_RESULTS_PLACEHOLDER);
    }

    #[test]
    fn test_process_mode_parsing() {
        assert_eq!(ProcessMode::from_wire("Hierarchical"), ProcessMode::Hierarchical);
        assert_eq!(ProcessMode::from_wire("hierarchical"), ProcessMode::Hierarchical);
        assert_eq!(ProcessMode::from_wire("Sequential"), ProcessMode::Sequential);
        assert_eq!(ProcessMode::from_wire(""), ProcessMode::Sequential);
        assert_eq!(ProcessMode::from_wire("parallel"), ProcessMode::Sequential);
    }

    #[test]
    fn test_link_and_unlink_preserve_order() {
        let mut m = mission();
        m.link_task(TaskId::from("t3"));
        m.link_task(TaskId::from("t1"));
        m.link_task(TaskId::from("t2"));
        assert!(m.unlink_task(&TaskId::from("t1")));
        assert!(!m.unlink_task(&TaskId::from("missing")));
        assert_eq!(m.tasks, vec![TaskId::from("t3"), TaskId::from("t2")]);
    }

    #[test]
    fn test_apply_edits_only_touches_given_fields() {
        let mut m = mission();
        m.apply(MissionEdits {
            game: Some("Snake".into()),
            process: Some(ProcessMode::Hierarchical),
            ..Default::default()
        });
        assert_eq!(m.game, "Snake");
        assert_eq!(m.process, ProcessMode::Hierarchical);
        assert_eq!(m.name, "Newsletter");
        assert_eq!(m.agents, vec![AgentId::from("a1")]);
    }
}
