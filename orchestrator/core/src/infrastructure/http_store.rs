// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! CRUD API Store Client
//!
//! `reqwest` implementation of the store traits against the CRUD API:
//!
//! | Resource | Methods |
//! |----------|---------|
//! | `/agents` | GET, POST, PUT, DELETE `{ids: [...]}` |
//! | `/missions` | GET, POST, PUT, DELETE `{ids: [...]}` |
//! | `/tasks` | GET, POST, DELETE `{id}` |
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Adapter from the store traits to HTTP
//!
//! Writes send plain JSON; the API applies the tagged encoding itself. Reads
//! come back as double-encoded envelopes and go through the wire codec.
//! Batch deletes are issued as one request per id so that a failing id never
//! prevents attempts on the others.

use anyhow::Context;
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::{Client, Method};
use serde::Serialize;

use crate::domain::agent::{Agent, AgentId};
use crate::domain::client_config::{ClientConfig, EndpointConfig};
use crate::domain::mission::{Mission, MissionId};
use crate::domain::repository::{AgentStore, DeleteReport, MissionStore, RepositoryError, TaskStore};
use crate::domain::task::{Task, TaskId};
use crate::infrastructure::wire::{Envelope, WireEntity};

#[derive(Debug, Clone)]
pub struct HttpStoreClient {
    client: Client,
    api: EndpointConfig,
}

/// Body shape of a delete request for one id.
#[derive(Debug, Clone, Copy)]
enum DeleteBody {
    /// `{"ids": [id]}`
    Batch,
    /// `{"id": id}`
    Single,
}

impl HttpStoreClient {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        // No client-wide timeout: CRUD calls rely on transport defaults.
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api: config.crud_api.clone(),
        })
    }

    pub fn with_client(client: Client, api: EndpointConfig) -> Self {
        Self { client, api }
    }

    pub fn base_url(&self) -> &str {
        self.api.base()
    }

    async fn fetch_list<T: WireEntity>(&self) -> Result<Vec<T>, RepositoryError> {
        let url = self.api.url(T::COLLECTION);
        tracing::debug!(collection = T::COLLECTION, %url, "Listing collection");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(RepositoryError::Transport(format!(
                "GET /{} returned HTTP {}: {}",
                T::COLLECTION,
                status,
                text
            )));
        }

        let envelope = Envelope::parse(&text)?;
        if let Some(code) = envelope.error_status() {
            return Err(RepositoryError::Transport(format!(
                "GET /{} failed with status {}: {}",
                T::COLLECTION,
                code,
                envelope.body_text()
            )));
        }

        let items = envelope.decode_items::<T>()?;
        tracing::debug!(collection = T::COLLECTION, count = items.len(), "Listed collection");
        Ok(items)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        collection: &str,
        body: &B,
    ) -> Result<(), RepositoryError> {
        let url = self.api.url(collection);
        let response = self
            .client
            .request(method.clone(), &url)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(RepositoryError::Transport(format!(
                "{} /{} returned HTTP {}: {}",
                method, collection, status, text
            )));
        }

        // Envelope bodies are informational; only an embedded failure status matters.
        if let Ok(envelope) = Envelope::parse(&text) {
            if let Some(code) = envelope.error_status() {
                return Err(RepositoryError::Transport(format!(
                    "{} /{} failed with status {}: {}",
                    method,
                    collection,
                    code,
                    envelope.body_text()
                )));
            }
        }

        Ok(())
    }

    async fn delete_each(&self, collection: &str, ids: Vec<&str>, shape: DeleteBody) -> DeleteReport {
        let attempts = ids.iter().map(|id| {
            let body = match shape {
                DeleteBody::Batch => serde_json::json!({ "ids": [id] }),
                DeleteBody::Single => serde_json::json!({ "id": id }),
            };
            async move {
                let result = self.send(Method::DELETE, collection, &body).await;
                if let Err(e) = &result {
                    tracing::warn!(collection, id = %id, "Delete failed: {}", e);
                }
                result.is_ok()
            }
        });

        let outcomes = join_all(attempts).await;
        let report = DeleteReport {
            requested: outcomes.len(),
            failed: outcomes.iter().filter(|ok| !**ok).count(),
        };
        tracing::info!(collection, attempted = report.requested, failed = report.failed, "Batch delete finished");
        report
    }
}

#[async_trait]
impl AgentStore for HttpStoreClient {
    async fn list(&self) -> Result<Vec<Agent>, RepositoryError> {
        self.fetch_list().await
    }

    async fn create(&self, agent: &Agent) -> Result<(), RepositoryError> {
        self.send(Method::POST, Agent::COLLECTION, agent).await
    }

    async fn put(&self, agent: &Agent) -> Result<(), RepositoryError> {
        self.send(Method::PUT, Agent::COLLECTION, agent).await
    }

    async fn delete(&self, ids: &[AgentId]) -> DeleteReport {
        let ids = ids.iter().map(|id| id.as_str()).collect();
        self.delete_each(Agent::COLLECTION, ids, DeleteBody::Batch).await
    }
}

#[async_trait]
impl TaskStore for HttpStoreClient {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        self.fetch_list().await
    }

    /// `/tasks` has no PUT; its POST is already an upsert by id.
    async fn put(&self, task: &Task) -> Result<(), RepositoryError> {
        self.send(Method::POST, Task::COLLECTION, task).await
    }

    async fn delete(&self, ids: &[TaskId]) -> DeleteReport {
        let ids = ids.iter().map(|id| id.as_str()).collect();
        self.delete_each(Task::COLLECTION, ids, DeleteBody::Single).await
    }
}

#[async_trait]
impl MissionStore for HttpStoreClient {
    async fn list(&self) -> Result<Vec<Mission>, RepositoryError> {
        self.fetch_list().await
    }

    async fn create(&self, mission: &Mission) -> Result<(), RepositoryError> {
        self.send(Method::POST, Mission::COLLECTION, mission).await
    }

    async fn put(&self, mission: &Mission) -> Result<(), RepositoryError> {
        self.send(Method::PUT, Mission::COLLECTION, mission).await
    }

    async fn delete(&self, ids: &[MissionId]) -> DeleteReport {
        let ids = ids.iter().map(|id| id.as_str()).collect();
        self.delete_each(Mission::COLLECTION, ids, DeleteBody::Batch).await
    }
}
