// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP client for the mission execution service (`POST /results`).
//!
//! No request timeout is set here: the orchestrator owns the budget and
//! cancels the call by dropping the future.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::domain::client_config::{ClientConfig, EndpointConfig};
use crate::domain::inference::{ExecutionRequest, ExecutionResponse, InferenceError, InferenceService};

pub struct HttpInferenceClient {
    client: Client,
    api: EndpointConfig,
}

impl HttpInferenceClient {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api: config.inference_api.clone(),
        })
    }

    pub fn endpoint(&self) -> String {
        self.api.url("results")
    }
}

#[async_trait]
impl InferenceService for HttpInferenceClient {
    async fn run_mission(&self, request: &ExecutionRequest) -> Result<ExecutionResponse, InferenceError> {
        let url = self.endpoint();
        tracing::debug!(mission_id = %request.id, %url, "Requesting mission execution");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::GATEWAY_TIMEOUT {
            return Err(InferenceError::UpstreamTimeout);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        serde_json::from_str(&body)
            .map_err(|e| InferenceError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}
