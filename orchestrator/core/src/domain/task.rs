// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Task
//!
//! A unit of work with a description and an expected output, bound to exactly
//! one agent by id. Descriptions may be authored as templates over the
//! mission's scenario ("game") text but are always stored resolved.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::agent::AgentId;

/// Placeholder substituted with the mission scenario in scenario templates.
pub const GAME_PLACEHOLDER: &str = "{game}";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Display name
    pub task: String,
    pub description: String,
    pub expected_output: String,
    pub agent: AgentId,
}

/// Task description as authored: fixed text, or text derived from the
/// scenario of the mission the task is created for.
#[derive(Clone)]
pub enum DescriptionTemplate {
    Static(String),
    Scenario(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl DescriptionTemplate {
    /// Builds a scenario template that substitutes every `{game}` occurrence.
    /// Text without the placeholder stays static.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.contains(GAME_PLACEHOLDER) {
            DescriptionTemplate::Scenario(Arc::new(move |game| text.replace(GAME_PLACEHOLDER, game)))
        } else {
            DescriptionTemplate::Static(text)
        }
    }

    pub fn resolve(&self, game: &str) -> String {
        match self {
            DescriptionTemplate::Static(text) => text.clone(),
            DescriptionTemplate::Scenario(render) => render(game),
        }
    }

    pub fn is_scenario(&self) -> bool {
        matches!(self, DescriptionTemplate::Scenario(_))
    }
}

impl std::fmt::Debug for DescriptionTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescriptionTemplate::Static(text) => f.debug_tuple("Static").field(text).finish(),
            DescriptionTemplate::Scenario(_) => f.write_str("Scenario(..)"),
        }
    }
}

impl From<&str> for DescriptionTemplate {
    fn from(text: &str) -> Self {
        DescriptionTemplate::Static(text.to_string())
    }
}

impl From<String> for DescriptionTemplate {
    fn from(text: String) -> Self {
        DescriptionTemplate::Static(text)
    }
}

/// Everything needed to create a task except its id.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub task: String,
    pub description: DescriptionTemplate,
    pub expected_output: String,
    pub agent: AgentId,
}

impl TaskDraft {
    pub fn new(
        task: impl Into<String>,
        description: impl Into<DescriptionTemplate>,
        expected_output: impl Into<String>,
        agent: AgentId,
    ) -> Self {
        Self {
            task: task.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
        }
    }

    /// Resolves the description against `game` and assigns the id.
    pub fn into_task(self, id: TaskId, game: &str) -> Task {
        Task {
            id,
            description: self.description.resolve(game),
            task: self.task,
            expected_output: self.expected_output,
            agent: self.agent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_description_ignores_game() {
        let draft = TaskDraft::new("Review", "Check the code", "Code", AgentId::from("2"));
        let task = draft.into_task(TaskId::from("10"), "Snake");
        assert_eq!(task.description, "Check the code");
        assert_eq!(task.agent, AgentId::from("2"));
    }

    #[test]
    fn test_placeholder_template_is_resolved() {
        let template = DescriptionTemplate::from_text("Instructions\n------------\n{game}");
        assert!(template.is_scenario());
        assert_eq!(template.resolve("Build pong"), "Instructions\n------------\nBuild pong");
    }

    #[test]
    fn test_closure_template() {
        let template = DescriptionTemplate::Scenario(Arc::new(|game: &str| format!("Make {} fun", game)));
        let draft = TaskDraft {
            task: "Code".into(),
            description: template,
            expected_output: "python".into(),
            agent: AgentId::from("1"),
        };
        assert_eq!(draft.into_task(TaskId::from("3"), "tetris").description, "Make tetris fun");
    }

    #[test]
    fn test_text_without_placeholder_is_static() {
        assert!(!DescriptionTemplate::from_text("no scenario here").is_scenario());
    }
}
