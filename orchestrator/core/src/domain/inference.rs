// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Inference
//!
//! Domain interface for the external execution service that runs a mission's
//! tasks. The service fetches mission, task and agent detail from the CRUD
//! API itself, so a request carries only the mission id and that API's base
//! address. Implementations live in `infrastructure::inference_client`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::mission::MissionId;

#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Runs the mission to completion. May take tens of seconds; callers
    /// impose their own timeout.
    async fn run_mission(&self, request: &ExecutionRequest) -> Result<ExecutionResponse, InferenceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub id: MissionId,
    #[serde(rename = "apiEndpoint")]
    pub api_endpoint: String,
}

/// Raw response body. `task_outputs` entries are JSON-encoded payloads,
/// classified by [`TaskOutput::parse`](crate::domain::execution::TaskOutput::parse).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    #[serde(default)]
    pub results: String,
    #[serde(default)]
    pub task_outputs: Vec<String>,
    #[serde(default)]
    pub execution_time: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// The gateway in front of the service gave up (HTTP 504).
    #[error("Upstream timed out")]
    UpstreamTimeout,

    #[error("HTTP status {status}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl InferenceError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, InferenceError::UpstreamTimeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case_endpoint() {
        let request = ExecutionRequest {
            id: MissionId::from("42"),
            api_endpoint: "https://crud.example.com/prod".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"id": "42", "apiEndpoint": "https://crud.example.com/prod"}));
    }

    #[test]
    fn test_http_error_message_names_status() {
        let err = InferenceError::Http { status: 500, body: "boom".into() };
        assert_eq!(err.to_string(), "HTTP status 500");
        assert!(!err.is_timeout());
        assert!(InferenceError::UpstreamTimeout.is_timeout());
    }
}
