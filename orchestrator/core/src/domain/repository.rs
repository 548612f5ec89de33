// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Store Client Interfaces
//!
//! Persistence contracts for the three collections, one trait per aggregate,
//! implemented in `crate::infrastructure`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `AgentStore` | `Agent` | `HttpStoreClient`, `InMemoryStoreClient` |
//! | `TaskStore` | `Task` | `HttpStoreClient`, `InMemoryStoreClient` |
//! | `MissionStore` | `Mission` | `HttpStoreClient`, `InMemoryStoreClient` |
//!
//! ## Contract
//!
//! - `list()` returns every item, decoded, in no particular order.
//! - `put()` is an upsert by id with full-replace semantics.
//! - `create()` defaults to `put()`; backends with a distinct create call
//!   override it.
//! - `delete()` attempts every id independently. Missing ids are not errors
//!   and one failure never stops the remaining attempts; failures are only
//!   counted in the returned [`DeleteReport`].
//! - Nothing is cached and nothing is retried.

use async_trait::async_trait;

use crate::domain::agent::{Agent, AgentId};
use crate::domain::mission::{Mission, MissionId};
use crate::domain::task::{Task, TaskId};

#[async_trait]
pub trait AgentStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Agent>, RepositoryError>;

    async fn create(&self, agent: &Agent) -> Result<(), RepositoryError> {
        self.put(agent).await
    }

    async fn put(&self, agent: &Agent) -> Result<(), RepositoryError>;

    async fn delete(&self, ids: &[AgentId]) -> DeleteReport;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError>;

    async fn create(&self, task: &Task) -> Result<(), RepositoryError> {
        self.put(task).await
    }

    async fn put(&self, task: &Task) -> Result<(), RepositoryError>;

    async fn delete(&self, ids: &[TaskId]) -> DeleteReport;
}

#[async_trait]
pub trait MissionStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Mission>, RepositoryError>;

    async fn create(&self, mission: &Mission) -> Result<(), RepositoryError> {
        self.put(mission).await
    }

    async fn put(&self, mission: &Mission) -> Result<(), RepositoryError>;

    async fn delete(&self, ids: &[MissionId]) -> DeleteReport;
}

/// Outcome of a batch delete: how many ids were attempted and how many of
/// those attempts failed. Per-id detail is only logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub requested: usize,
    pub failed: usize,
}

impl DeleteReport {
    pub fn succeeded(&self) -> usize {
        self.requested - self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    pub fn merge(self, other: DeleteReport) -> DeleteReport {
        DeleteReport {
            requested: self.requested + other.requested,
            failed: self.failed + other.failed,
        }
    }
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed wire payload: {0}")]
    Codec(String),
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        RepositoryError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Codec(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_report_counts() {
        let report = DeleteReport { requested: 3, failed: 1 }.merge(DeleteReport { requested: 1, failed: 0 });
        assert_eq!(report.requested, 4);
        assert_eq!(report.succeeded(), 3);
        assert!(!report.is_clean());
        assert!(DeleteReport::default().is_clean());
    }
}
