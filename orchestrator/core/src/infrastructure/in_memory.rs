// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-Memory Store Client
//!
//! Lightweight implementation of the store traits for tests and offline use.
//! Items are kept wire-encoded per collection, the way the storage table holds
//! them, and decoded on every `list()`, so reads exercise the same codec path
//! as the HTTP client.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Thread-safe HashMap-backed storage
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! Test hooks: a counter of mutating calls, per-id failure injection and an
//! offline switch that makes every call fail with a transport error.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::agent::{Agent, AgentId};
use crate::domain::mission::{Mission, MissionId};
use crate::domain::repository::{AgentStore, DeleteReport, MissionStore, RepositoryError, TaskStore};
use crate::domain::task::{Task, TaskId};
use crate::infrastructure::wire::{WireEntity, WireItem};

type Collection = HashMap<String, WireItem>;

#[derive(Clone, Default)]
pub struct InMemoryStoreClient {
    collections: Arc<RwLock<HashMap<&'static str, Collection>>>,
    failing_ids: Arc<RwLock<HashSet<String>>>,
    write_calls: Arc<AtomicUsize>,
    offline: Arc<AtomicBool>,
}

impl InMemoryStoreClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entity without counting it as a write call.
    pub fn seed<T: WireEntity>(&self, entity: &T) -> Result<(), RepositoryError> {
        self.insert(entity)
    }

    pub fn seed_all<'a, T: WireEntity + 'a>(
        &self,
        entities: impl IntoIterator<Item = &'a T>,
    ) -> Result<(), RepositoryError> {
        entities.into_iter().try_for_each(|e| self.seed(e))
    }

    /// Stores a raw item as is, bypassing the encoder.
    pub fn seed_raw(&self, collection: &'static str, key: &str, item: WireItem) -> Result<(), RepositoryError> {
        let mut collections = self.write_lock()?;
        collections.entry(collection).or_default().insert(key.to_string(), item);
        Ok(())
    }

    /// Makes every mutating call touching `id` fail.
    pub fn fail_on(&self, id: &str) {
        if let Ok(mut ids) = self.failing_ids.write() {
            ids.insert(id.to_string());
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of mutating calls (create, put, per-id delete) received.
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, |items| items.len()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    pub fn contains(&self, collection: &str, id: &str) -> bool {
        self.collections
            .read()
            .map(|c| c.get(collection).is_some_and(|items| items.contains_key(id)))
            .unwrap_or(false)
    }

    /// Decoded entity by id, for assertions.
    pub fn get<T: WireEntity>(&self, id: &str) -> Option<T> {
        let collections = self.collections.read().ok()?;
        let item = collections.get(T::COLLECTION)?.get(id)?;
        T::decode(item).ok()
    }

    fn write_lock(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<&'static str, Collection>>, RepositoryError> {
        self.collections
            .write()
            .map_err(|_| RepositoryError::Transport("in-memory store lock poisoned".to_string()))
    }

    fn check_online(&self) -> Result<(), RepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepositoryError::Transport("store is offline".to_string()));
        }
        Ok(())
    }

    fn check_failing(&self, id: &str) -> Result<(), RepositoryError> {
        let failing = self
            .failing_ids
            .read()
            .map_err(|_| RepositoryError::Transport("in-memory store lock poisoned".to_string()))?;
        if failing.contains(id) {
            return Err(RepositoryError::Transport(format!("injected failure for id {}", id)));
        }
        Ok(())
    }

    fn insert<T: WireEntity>(&self, entity: &T) -> Result<(), RepositoryError> {
        let mut collections = self.write_lock()?;
        collections
            .entry(T::COLLECTION)
            .or_default()
            .insert(entity.id().to_string(), entity.encode());
        Ok(())
    }

    fn list_all<T: WireEntity>(&self) -> Result<Vec<T>, RepositoryError> {
        self.check_online()?;
        let collections = self
            .collections
            .read()
            .map_err(|_| RepositoryError::Transport("in-memory store lock poisoned".to_string()))?;

        let Some(items) = collections.get(T::COLLECTION) else {
            return Ok(Vec::new());
        };

        let mut entities = Vec::with_capacity(items.len());
        for (key, item) in items {
            match T::decode(item) {
                Ok(entity) => entities.push(entity),
                Err(e) => tracing::warn!(collection = T::COLLECTION, key = %key, "Skipping undecodable item: {}", e),
            }
        }
        Ok(entities)
    }

    fn upsert<T: WireEntity>(&self, entity: &T) -> Result<(), RepositoryError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.check_failing(entity.id())?;
        self.insert(entity)
    }

    fn remove_each(&self, collection: &'static str, ids: &[&str]) -> DeleteReport {
        let mut report = DeleteReport {
            requested: ids.len(),
            failed: 0,
        };

        for id in ids {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            let result = self.check_online().and_then(|_| self.check_failing(id)).and_then(|_| {
                let mut collections = self.write_lock()?;
                if let Some(items) = collections.get_mut(collection) {
                    items.remove(*id);
                }
                Ok(())
            });

            if let Err(e) = result {
                tracing::warn!(collection, id = %id, "Delete failed: {}", e);
                report.failed += 1;
            }
        }

        report
    }
}

#[async_trait]
impl AgentStore for InMemoryStoreClient {
    async fn list(&self) -> Result<Vec<Agent>, RepositoryError> {
        self.list_all()
    }

    async fn put(&self, agent: &Agent) -> Result<(), RepositoryError> {
        self.upsert(agent)
    }

    async fn delete(&self, ids: &[AgentId]) -> DeleteReport {
        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        self.remove_each(Agent::COLLECTION, &ids)
    }
}

#[async_trait]
impl TaskStore for InMemoryStoreClient {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        self.list_all()
    }

    async fn put(&self, task: &Task) -> Result<(), RepositoryError> {
        self.upsert(task)
    }

    async fn delete(&self, ids: &[TaskId]) -> DeleteReport {
        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        self.remove_each(Task::COLLECTION, &ids)
    }
}

#[async_trait]
impl MissionStore for InMemoryStoreClient {
    async fn list(&self) -> Result<Vec<Mission>, RepositoryError> {
        self.list_all()
    }

    async fn put(&self, mission: &Mission) -> Result<(), RepositoryError> {
        self.upsert(mission)
    }

    async fn delete(&self, ids: &[MissionId]) -> DeleteReport {
        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        self.remove_each(Mission::COLLECTION, &ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::AgentDraft;
    use crate::domain::task::TaskDraft;
    use crate::infrastructure::wire::AttributeValue;

    fn task(id: &str) -> Task {
        TaskDraft::new(id, "d", "o", AgentId::from("1")).into_task(TaskId::from(id), "")
    }

    #[tokio::test]
    async fn test_partial_batch_delete() {
        let store = InMemoryStoreClient::new();
        store.seed_all([&task("a"), &task("b")]).unwrap();

        let report = TaskStore::delete(&store, &[TaskId::from("a"), TaskId::from("missing"), TaskId::from("b")]).await;

        assert_eq!(report, DeleteReport { requested: 3, failed: 0 });
        assert!(store.is_empty("tasks"));
    }

    #[tokio::test]
    async fn test_injected_failure_does_not_block_other_ids() {
        let store = InMemoryStoreClient::new();
        store.seed_all([&task("a"), &task("b"), &task("c")]).unwrap();
        store.fail_on("b");

        let report = TaskStore::delete(&store, &[TaskId::from("a"), TaskId::from("b"), TaskId::from("c")]).await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.succeeded(), 2);
        assert!(store.contains("tasks", "b"));
        assert!(!store.contains("tasks", "c"));
    }

    #[tokio::test]
    async fn test_put_replaces_and_counts_writes() {
        let store = InMemoryStoreClient::new();
        let mut agent = AgentDraft::new("Writer", "g", "b").into_agent(AgentId::from("7"));
        AgentStore::put(&store, &agent).await.unwrap();
        agent.goal = "new goal".into();
        AgentStore::put(&store, &agent).await.unwrap();

        let agents = AgentStore::list(&store).await.unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].goal, "new goal");
        assert_eq!(store.write_calls(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_items_are_skipped_on_list() {
        let store = InMemoryStoreClient::new();
        store.seed(&task("ok")).unwrap();
        store
            .seed_raw("tasks", "bad", WireItem::from([("id".to_string(), AttributeValue::Bool(true))]))
            .unwrap();

        let tasks = TaskStore::list(&store).await.unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_offline_store_fails_reads() {
        let store = InMemoryStoreClient::new();
        store.set_offline(true);
        assert!(matches!(MissionStore::list(&store).await, Err(RepositoryError::Transport(_))));
    }
}
