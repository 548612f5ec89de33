// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use crate::application::errors::ServiceError;
use crate::domain::identity::{IdGenerator, RandomIdGenerator};
use crate::domain::repository::{DeleteReport, TaskStore};
use crate::domain::task::{Task, TaskDraft, TaskId};
use crate::domain::validation::require;

/// Task service. Tasks have no uniqueness rule beyond their id.
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    ids: Arc<dyn IdGenerator>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            ids: Arc::new(RandomIdGenerator),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub async fn list(&self) -> Vec<Task> {
        match self.store.list().await {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::warn!(collection = "tasks", "Listing failed, showing no tasks: {}", e);
                Vec::new()
            }
        }
    }

    /// Creates a task, resolving its description against `game`.
    ///
    /// Ids are drawn without a collision check; creating a task never reads
    /// the collection.
    pub async fn create(&self, draft: TaskDraft, game: &str) -> Result<Task, ServiceError> {
        require("Task", "task", &draft.task)?;
        require("Task", "agent", draft.agent.as_str())?;

        let task = draft.into_task(TaskId(self.ids.next_id()), game);
        self.store.create(&task).await?;
        tracing::info!(task_id = %task.id, agent_id = %task.agent, "Created task");
        Ok(task)
    }

    /// Does not unlink the task from missions that reference it.
    pub async fn delete(&self, id: &TaskId) -> DeleteReport {
        self.delete_many(std::slice::from_ref(id)).await
    }

    pub async fn delete_many(&self, ids: &[TaskId]) -> DeleteReport {
        let report = self.store.delete(ids).await;
        if !report.is_clean() {
            tracing::warn!(attempted = report.requested, failed = report.failed, "Some tasks could not be deleted");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::AgentId;
    use crate::domain::identity::SequentialIdGenerator;
    use crate::domain::task::DescriptionTemplate;
    use crate::infrastructure::in_memory::InMemoryStoreClient;

    #[tokio::test]
    async fn test_create_resolves_scenario_description() {
        let store = InMemoryStoreClient::new();
        let service = TaskService::new(Arc::new(store.clone()))
            .with_id_generator(Arc::new(SequentialIdGenerator::starting_at(100)));

        let draft = TaskDraft::new(
            "Design NPC",
            DescriptionTemplate::from_text("Create a character for {game}."),
            "300 words",
            AgentId::from("4"),
        );
        let task = service.create(draft, "a vampire city").await.unwrap();

        assert_eq!(task.id.as_str(), "100");
        let stored: Task = store.get("100").unwrap();
        assert_eq!(stored.description, "Create a character for a vampire city.");
    }

    #[tokio::test]
    async fn test_task_requires_an_agent() {
        let store = InMemoryStoreClient::new();
        let service = TaskService::new(Arc::new(store.clone()));

        let err = service
            .create(TaskDraft::new("Orphan", "d", "o", AgentId::from("")), "")
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.write_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_single_task() {
        let store = InMemoryStoreClient::new();
        let service = TaskService::new(Arc::new(store.clone()));
        let task = service.create(TaskDraft::new("T", "d", "o", AgentId::from("1")), "").await.unwrap();

        let report = service.delete(&task.id).await;

        assert!(report.is_clean());
        assert!(service.list().await.is_empty());
    }
}
