// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Agent Service
//!
//! Typed wrapper over [`AgentStore`] that validates before writing. The role
//! uniqueness check is case-insensitive and advisory: it reads the collection
//! first, so two concurrent creators can still both pass it.

use std::sync::Arc;

use crate::application::errors::ServiceError;
use crate::domain::agent::{Agent, AgentDraft, AgentId};
use crate::domain::identity::{allocate_id, IdGenerator, RandomIdGenerator};
use crate::domain::repository::{AgentStore, DeleteReport};
use crate::domain::validation::{ensure_unique_role, require};

pub struct AgentService {
    store: Arc<dyn AgentStore>,
    ids: Arc<dyn IdGenerator>,
}

impl AgentService {
    pub fn new(store: Arc<dyn AgentStore>) -> Self {
        Self {
            store,
            ids: Arc::new(RandomIdGenerator),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// All agents. A failed read is logged and yields an empty list.
    pub async fn list(&self) -> Vec<Agent> {
        match self.store.list().await {
            Ok(agents) => agents,
            Err(e) => {
                tracing::warn!(collection = "agents", "Listing failed, showing no agents: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn find(&self, id: &AgentId) -> Result<Option<Agent>, ServiceError> {
        let agents = self.store.list().await?;
        Ok(agents.into_iter().find(|a| &a.id == id))
    }

    pub async fn create(&self, draft: AgentDraft) -> Result<Agent, ServiceError> {
        require("Agent", "role", &draft.role)?;

        let existing = self.store.list().await?;
        ensure_unique_role(&existing, &draft.role, None)?;

        let id = allocate_id(self.ids.as_ref(), |candidate| {
            existing.iter().any(|a| a.id.as_str() == candidate)
        });
        let agent = draft.into_agent(AgentId(id));

        self.store.create(&agent).await?;
        tracing::info!(agent_id = %agent.id, role = %agent.role, "Created agent");
        Ok(agent)
    }

    /// Full replace by id. The new role must not clash with any other agent.
    pub async fn update(&self, agent: &Agent) -> Result<(), ServiceError> {
        require("Agent", "role", &agent.role)?;

        let existing = self.store.list().await?;
        ensure_unique_role(&existing, &agent.role, Some(agent.id.as_str()))?;

        self.store.put(agent).await?;
        tracing::info!(agent_id = %agent.id, "Updated agent");
        Ok(())
    }

    /// Missions that reference a deleted agent keep the dangling id.
    pub async fn delete_many(&self, ids: &[AgentId]) -> DeleteReport {
        let report = self.store.delete(ids).await;
        if !report.is_clean() {
            tracing::warn!(attempted = report.requested, failed = report.failed, "Some agents could not be deleted");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::SequentialIdGenerator;
    use crate::infrastructure::in_memory::InMemoryStoreClient;

    fn service(store: &InMemoryStoreClient) -> AgentService {
        AgentService::new(Arc::new(store.clone())).with_id_generator(Arc::new(SequentialIdGenerator::starting_at(1)))
    }

    #[tokio::test]
    async fn test_duplicate_role_rejected_before_any_write() {
        let store = InMemoryStoreClient::new();
        store.seed(&AgentDraft::new("engineer", "g", "b").into_agent(AgentId::from("9"))).unwrap();

        let err = service(&store).create(AgentDraft::new("Engineer", "g", "b")).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.write_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_skips_taken_ids() {
        let store = InMemoryStoreClient::new();
        store.seed(&AgentDraft::new("Writer", "g", "b").into_agent(AgentId::from("1"))).unwrap();

        let agent = service(&store).create(AgentDraft::new("Editor", "g", "b")).await.unwrap();

        assert_eq!(agent.id.as_str(), "2");
        assert_eq!(store.len("agents"), 2);
    }

    #[tokio::test]
    async fn test_update_may_keep_its_own_role() {
        let store = InMemoryStoreClient::new();
        let mut agent = AgentDraft::new("Writer", "g", "b").into_agent(AgentId::from("1"));
        store.seed(&agent).unwrap();
        store.seed(&AgentDraft::new("Editor", "g", "b").into_agent(AgentId::from("2"))).unwrap();
        let service = service(&store);

        agent.role = "WRITER".into();
        service.update(&agent).await.unwrap();

        agent.role = "editor".into();
        assert!(service.update(&agent).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_empty_role_is_rejected() {
        let store = InMemoryStoreClient::new();
        let err = service(&store).create(AgentDraft::new("  ", "g", "b")).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_list_degrades_when_store_is_down() {
        let store = InMemoryStoreClient::new();
        store.set_offline(true);
        assert!(service(&store).list().await.is_empty());
    }
}
