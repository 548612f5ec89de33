// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Per-entity wire schemas
//!
//! | Collection | Fields |
//! |------------|--------|
//! | agents | id S, role S, goal S, backstory S, allow_delegation BOOL, tools L<S> |
//! | tasks | id S, task S, description S, expected_output S, agent S |
//! | missions | id S, name S, game S, agents L<S>, tasks L<S>, process S, results S |

use crate::domain::agent::{Agent, AgentId, AgentTool};
use crate::domain::mission::{Mission, MissionId, ProcessMode};
use crate::domain::task::{Task, TaskId};

use super::attribute::{AttributeValue, FieldReader, WireItem};
use super::CodecError;

/// Mapping between a domain entity and its stored item.
pub trait WireEntity: Sized {
    /// Collection name, used in logs and resource paths.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn encode(&self) -> WireItem;

    fn decode(item: &WireItem) -> Result<Self, CodecError>;
}

impl WireEntity for Agent {
    const COLLECTION: &'static str = "agents";

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn encode(&self) -> WireItem {
        WireItem::from([
            ("id".to_string(), AttributeValue::from(self.id.as_str())),
            ("role".to_string(), AttributeValue::from(self.role.as_str())),
            ("goal".to_string(), AttributeValue::from(self.goal.as_str())),
            ("backstory".to_string(), AttributeValue::from(self.backstory.as_str())),
            ("allow_delegation".to_string(), AttributeValue::from(self.allow_delegation)),
            ("tools".to_string(), AttributeValue::string_list(self.tools.iter().map(|t| t.as_str()))),
        ])
    }

    fn decode(item: &WireItem) -> Result<Self, CodecError> {
        let fields = FieldReader::new(item);
        let id = fields.required_string("id")?;

        let mut tools = std::collections::BTreeSet::new();
        for name in fields.string_list("tools")? {
            match name.parse::<AgentTool>() {
                Ok(tool) => {
                    tools.insert(tool);
                }
                Err(e) => tracing::warn!(agent_id = %id, "Skipping tool: {}", e),
            }
        }

        Ok(Agent {
            id: AgentId(id),
            role: fields.string("role")?,
            goal: fields.string("goal")?,
            backstory: fields.string("backstory")?,
            allow_delegation: fields.bool("allow_delegation")?,
            tools,
        })
    }
}

impl WireEntity for Task {
    const COLLECTION: &'static str = "tasks";

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn encode(&self) -> WireItem {
        WireItem::from([
            ("id".to_string(), AttributeValue::from(self.id.as_str())),
            ("task".to_string(), AttributeValue::from(self.task.as_str())),
            ("description".to_string(), AttributeValue::from(self.description.as_str())),
            ("expected_output".to_string(), AttributeValue::from(self.expected_output.as_str())),
            ("agent".to_string(), AttributeValue::from(self.agent.as_str())),
        ])
    }

    fn decode(item: &WireItem) -> Result<Self, CodecError> {
        let fields = FieldReader::new(item);
        Ok(Task {
            id: TaskId(fields.required_string("id")?),
            task: fields.string("task")?,
            description: fields.string("description")?,
            expected_output: fields.string("expected_output")?,
            agent: AgentId(fields.string("agent")?),
        })
    }
}

impl WireEntity for Mission {
    const COLLECTION: &'static str = "missions";

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn encode(&self) -> WireItem {
        WireItem::from([
            ("id".to_string(), AttributeValue::from(self.id.as_str())),
            ("name".to_string(), AttributeValue::from(self.name.as_str())),
            ("game".to_string(), AttributeValue::from(self.game.as_str())),
            ("agents".to_string(), AttributeValue::string_list(self.agents.iter().map(|a| a.as_str()))),
            ("tasks".to_string(), AttributeValue::string_list(self.tasks.iter().map(|t| t.as_str()))),
            ("process".to_string(), AttributeValue::from(self.process.as_str())),
            ("results".to_string(), AttributeValue::from(self.results.as_str())),
        ])
    }

    fn decode(item: &WireItem) -> Result<Self, CodecError> {
        let fields = FieldReader::new(item);
        Ok(Mission {
            id: MissionId(fields.required_string("id")?),
            name: fields.string("name")?,
            game: fields.string("game")?,
            agents: fields.string_list("agents")?.into_iter().map(AgentId).collect(),
            tasks: fields.string_list("tasks")?.into_iter().map(TaskId).collect(),
            process: ProcessMode::from_wire(&fields.string("process")?),
            results: fields.string("results")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::AgentDraft;
    use crate::domain::mission::MissionDraft;
    use crate::domain::task::TaskDraft;

    fn roundtrip<T: WireEntity + PartialEq + std::fmt::Debug>(value: T) {
        let decoded = T::decode(&value.encode()).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_entities_roundtrip() {
        roundtrip(
            AgentDraft::new("NPC Sculptor", "Draw characters", "Digital artist")
                .with_tool(AgentTool::ImageGenerator)
                .with_tool(AgentTool::CodeInterpreter)
                .with_delegation(true)
                .into_agent(AgentId::from("415")),
        );
        roundtrip(AgentDraft::new("", "", "").into_agent(AgentId::from("0")));

        roundtrip(
            TaskDraft::new("Design NPC", "Create an archetype", "300 words", AgentId::from("415"))
                .into_task(TaskId::from("77"), ""),
        );

        let mut mission = MissionDraft::new("Bloodlines", "Vampires", vec![AgentId::from("415")])
            .into_mission(MissionId::from("9"));
        mission.link_task(TaskId::from("3"));
        mission.link_task(TaskId::from("1"));
        mission.process = ProcessMode::Hierarchical;
        mission.results = "done".into();
        roundtrip(mission);
    }

    #[test]
    fn test_agent_without_tools_decodes() {
        let item: WireItem = serde_json::from_str(
            r#"{"id":{"S":"1"},"role":{"S":"Writer"},"goal":{"S":"g"},"backstory":{"S":"b"},"allow_delegation":{"BOOL":false}}"#,
        )
        .unwrap();
        let agent = Agent::decode(&item).unwrap();
        assert_eq!(agent.role, "Writer");
        assert!(agent.tools.is_empty());
    }

    #[test]
    fn test_unknown_tools_are_skipped() {
        let item: WireItem = serde_json::from_str(
            r#"{"id":{"S":"1"},"tools":{"L":[{"S":"Browser"},{"S":"CodeInterpreter"}]}}"#,
        )
        .unwrap();
        let agent = Agent::decode(&item).unwrap();
        assert_eq!(agent.tools.len(), 1);
        assert!(agent.has_tool(AgentTool::CodeInterpreter));
    }

    #[test]
    fn test_sparse_mission_takes_defaults() {
        let item: WireItem = serde_json::from_str(r#"{"id":{"S":"m"},"name":{"S":"Snake"}}"#).unwrap();
        let mission = Mission::decode(&item).unwrap();
        assert!(mission.agents.is_empty());
        assert!(mission.tasks.is_empty());
        assert_eq!(mission.process, ProcessMode::Sequential);
        assert_eq!(mission.results, "");
    }

    #[test]
    fn test_item_without_id_is_rejected() {
        let item: WireItem = serde_json::from_str(r#"{"task":{"S":"Orphan"}}"#).unwrap();
        assert!(matches!(Task::decode(&item), Err(CodecError::MissingField("id"))));
    }
}
