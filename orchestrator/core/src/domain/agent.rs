// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Agent Aggregate
//!
//! A reusable persona profile (role, goal, backstory, delegation flag and tool
//! access) that tasks are bound to and missions reference by id.
//!
//! | Field | Notes |
//! |-------|-------|
//! | `id` | caller-generated random numeric string |
//! | `role` | display key; unique across agents (case-insensitive, client-enforced) |
//! | `tools` | subset of [`AgentTool`], empty by default |
//!
//! Agents are deleted without cascading: missions keep dangling ids, which the
//! Mission Composer filters at read time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier of an agent as stored by the CRUD API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Tools the execution service can attach to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentTool {
    ImageGenerator,
    CodeInterpreter,
}

impl AgentTool {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentTool::ImageGenerator => "ImageGenerator",
            AgentTool::CodeInterpreter => "CodeInterpreter",
        }
    }
}

impl std::fmt::Display for AgentTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgentTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ImageGenerator" => Ok(AgentTool::ImageGenerator),
            "CodeInterpreter" => Ok(AgentTool::CodeInterpreter),
            other => Err(format!("unknown agent tool '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub allow_delegation: bool,
    #[serde(default)]
    pub tools: BTreeSet<AgentTool>,
}

impl Agent {
    /// Case-insensitive role comparison used for duplicate detection.
    pub fn has_role(&self, role: &str) -> bool {
        self.role.to_lowercase() == role.to_lowercase()
    }

    pub fn has_tool(&self, tool: AgentTool) -> bool {
        self.tools.contains(&tool)
    }
}

/// Everything needed to create an agent except its id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDraft {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    #[serde(default)]
    pub allow_delegation: bool,
    #[serde(default)]
    pub tools: BTreeSet<AgentTool>,
}

impl AgentDraft {
    pub fn new(role: impl Into<String>, goal: impl Into<String>, backstory: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            allow_delegation: false,
            tools: BTreeSet::new(),
        }
    }

    pub fn with_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    pub fn with_tool(mut self, tool: AgentTool) -> Self {
        self.tools.insert(tool);
        self
    }

    pub fn into_agent(self, id: AgentId) -> Agent {
        Agent {
            id,
            role: self.role,
            goal: self.goal,
            backstory: self.backstory,
            allow_delegation: self.allow_delegation,
            tools: self.tools,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_comparison_ignores_case() {
        let agent = AgentDraft::new("Engineer", "build", "years of it").into_agent(AgentId::from("1"));
        assert!(agent.has_role("engineer"));
        assert!(agent.has_role("ENGINEER"));
        assert!(!agent.has_role("Engineers"));
    }

    #[test]
    fn test_tools_serialize_by_variant_name() {
        let agent = AgentDraft::new("Sculptor", "draw", "artist")
            .with_tool(AgentTool::ImageGenerator)
            .into_agent(AgentId::from("7"));

        let json = serde_json::to_value(&agent).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["tools"][0], "ImageGenerator");
        assert_eq!(json["allow_delegation"], false);
    }

    #[test]
    fn test_missing_tools_default_to_empty() {
        let agent: Agent = serde_json::from_str(
            r#"{"id":"1","role":"r","goal":"g","backstory":"b","allow_delegation":true}"#,
        )
        .unwrap();
        assert!(agent.tools.is_empty());
        assert!(agent.allow_delegation);
    }

    #[test]
    fn test_tool_from_str() {
        assert_eq!("CodeInterpreter".parse::<AgentTool>(), Ok(AgentTool::CodeInterpreter));
        assert!("Browser".parse::<AgentTool>().is_err());
    }
}
