// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Pre-write Validation
//!
//! Checks run by the entity services before any write call is issued. They
//! are advisory: the CRUD API does not enforce them, so two concurrent
//! creators can still race past the check.
//!
//! | Rule | Entity | Comparison |
//! |------|--------|-----------|
//! | role unique | Agent | case-insensitive |
//! | name unique | Mission | exact |
//! | required text present | Agent, Task, Mission | trimmed non-empty |

use thiserror::Error;

use crate::domain::agent::Agent;
use crate::domain::mission::Mission;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("An agent with the role \"{0}\" already exists. Please use a different role name.")]
    DuplicateRole(String),

    #[error("Mission name already taken: \"{0}\"")]
    DuplicateMissionName(String),

    #[error("{entity} {field} cannot be empty")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
}

pub fn require(entity: &'static str, field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { entity, field });
    }
    Ok(())
}

/// Rejects `role` if any agent other than `except_id` already uses it.
pub fn ensure_unique_role(
    agents: &[Agent],
    role: &str,
    except_id: Option<&str>,
) -> Result<(), ValidationError> {
    let clash = agents
        .iter()
        .filter(|a| Some(a.id.as_str()) != except_id)
        .any(|a| a.has_role(role));
    if clash {
        return Err(ValidationError::DuplicateRole(role.to_string()));
    }
    Ok(())
}

pub fn ensure_unique_mission_name(
    missions: &[Mission],
    name: &str,
    except_id: Option<&str>,
) -> Result<(), ValidationError> {
    let clash = missions
        .iter()
        .filter(|m| Some(m.id.as_str()) != except_id)
        .any(|m| m.name == name);
    if clash {
        return Err(ValidationError::DuplicateMissionName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::{AgentDraft, AgentId};
    use crate::domain::mission::{MissionDraft, MissionId};

    #[test]
    fn test_duplicate_role_is_case_insensitive() {
        let agents = vec![AgentDraft::new("engineer", "g", "b").into_agent(AgentId::from("1"))];
        assert_eq!(
            ensure_unique_role(&agents, "Engineer", None),
            Err(ValidationError::DuplicateRole("Engineer".into()))
        );
        assert!(ensure_unique_role(&agents, "Engineer", Some("1")).is_ok());
        assert!(ensure_unique_role(&agents, "Designer", None).is_ok());
    }

    #[test]
    fn test_mission_names_compare_exactly() {
        let missions = vec![MissionDraft::new("Snake", "", vec![]).into_mission(MissionId::from("m"))];
        assert!(ensure_unique_mission_name(&missions, "Snake", None).is_err());
        assert!(ensure_unique_mission_name(&missions, "snake", None).is_ok());
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("Agent", "role", "  ").is_err());
        assert!(require("Agent", "role", "Writer").is_ok());
    }
}
