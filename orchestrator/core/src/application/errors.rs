// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use thiserror::Error;

use crate::domain::mission::MissionId;
use crate::domain::repository::RepositoryError;
use crate::domain::task::TaskId;
use crate::domain::validation::ValidationError;

/// Failure of an entity service call.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rejected before any write was issued.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }
}

#[derive(Debug, Error)]
pub enum ComposerError {
    #[error("Mission not found: {0}")]
    MissionNotFound(MissionId),

    /// The task was created but the mission still does not reference it.
    #[error("Task {task_id} was created but could not be linked to the mission: {source}")]
    TaskNotLinked {
        task_id: TaskId,
        #[source]
        source: ServiceError,
    },

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<RepositoryError> for ComposerError {
    fn from(err: RepositoryError) -> Self {
        ComposerError::Service(ServiceError::Repository(err))
    }
}

impl From<ValidationError> for ComposerError {
    fn from(err: ValidationError) -> Self {
        ComposerError::Service(ServiceError::Validation(err))
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("No example mission named \"{0}\"")]
    UnknownExample(String),

    #[error("Example \"{example}\" is malformed: {reason}")]
    InvalidExample { example: String, reason: String },

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        CatalogError::Service(ServiceError::Validation(err))
    }
}
