// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use crate::application::errors::ServiceError;
use crate::domain::identity::{allocate_id, IdGenerator, RandomIdGenerator};
use crate::domain::mission::{Mission, MissionDraft, MissionId};
use crate::domain::repository::{DeleteReport, MissionStore};
use crate::domain::validation::{ensure_unique_mission_name, require};

/// Mission service. Names are unique among missions (exact match), checked
/// on create only.
pub struct MissionService {
    store: Arc<dyn MissionStore>,
    ids: Arc<dyn IdGenerator>,
}

impl MissionService {
    pub fn new(store: Arc<dyn MissionStore>) -> Self {
        Self {
            store,
            ids: Arc::new(RandomIdGenerator),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub async fn list(&self) -> Vec<Mission> {
        match self.store.list().await {
            Ok(missions) => missions,
            Err(e) => {
                tracing::warn!(collection = "missions", "Listing failed, showing no missions: {}", e);
                Vec::new()
            }
        }
    }

    /// Looks a mission up by id. Unlike [`list`](Self::list), read failures
    /// are returned.
    pub async fn find(&self, id: &MissionId) -> Result<Option<Mission>, ServiceError> {
        let missions = self.store.list().await?;
        Ok(missions.into_iter().find(|m| &m.id == id))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Mission>, ServiceError> {
        let missions = self.store.list().await?;
        Ok(missions.into_iter().find(|m| m.name == name))
    }

    pub async fn create(&self, draft: MissionDraft) -> Result<Mission, ServiceError> {
        require("Mission", "name", &draft.name)?;

        let existing = self.store.list().await?;
        ensure_unique_mission_name(&existing, &draft.name, None)?;

        let id = allocate_id(self.ids.as_ref(), |candidate| {
            existing.iter().any(|m| m.id.as_str() == candidate)
        });
        let mission = draft.into_mission(MissionId(id));

        self.store.create(&mission).await?;
        tracing::info!(mission_id = %mission.id, name = %mission.name, "Created mission");
        Ok(mission)
    }

    /// Full-document replace. Last write wins.
    pub async fn save(&self, mission: &Mission) -> Result<(), ServiceError> {
        self.store.put(mission).await?;
        tracing::debug!(mission_id = %mission.id, tasks = mission.tasks.len(), "Saved mission");
        Ok(())
    }

    pub async fn delete_many(&self, ids: &[MissionId]) -> DeleteReport {
        let report = self.store.delete(ids).await;
        if !report.is_clean() {
            tracing::warn!(attempted = report.requested, failed = report.failed, "Some missions could not be deleted");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mission::ProcessMode;
    use crate::domain::repository::RepositoryError;
    use crate::infrastructure::in_memory::InMemoryStoreClient;

    #[tokio::test]
    async fn test_new_mission_is_sequential_and_empty() {
        let store = InMemoryStoreClient::new();
        let service = MissionService::new(Arc::new(store.clone()));

        let mission = service.create(MissionDraft::new("Snake", "A snake game", vec![])).await.unwrap();

        assert_eq!(mission.process, ProcessMode::Sequential);
        assert!(mission.tasks.is_empty());
        assert!(!mission.has_results());
        assert_eq!(service.find(&mission.id).await.unwrap(), Some(mission));
    }

    #[tokio::test]
    async fn test_duplicate_name_is_exact_match() {
        let store = InMemoryStoreClient::new();
        let service = MissionService::new(Arc::new(store.clone()));
        service.create(MissionDraft::new("Snake", "", vec![])).await.unwrap();

        assert!(service.create(MissionDraft::new("Snake", "", vec![])).await.unwrap_err().is_validation());
        assert!(service.create(MissionDraft::new("snake", "", vec![])).await.is_ok());
        assert_eq!(store.write_calls(), 2);
    }

    #[tokio::test]
    async fn test_create_propagates_read_failure() {
        let store = InMemoryStoreClient::new();
        store.set_offline(true);
        let service = MissionService::new(Arc::new(store));

        let err = service.create(MissionDraft::new("Snake", "", vec![])).await.unwrap_err();
        assert!(matches!(err, ServiceError::Repository(RepositoryError::Transport(_))));
    }
}
