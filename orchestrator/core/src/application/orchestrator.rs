// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Execution Orchestrator
//!
//! Runs a mission against the external execution service and reconciles the
//! stored mission with the outcome.
//!
//! # Architecture
//!
//! - **Layer:** Application
//! - **Purpose:** Mission run workflow
//!
//! # Run Lifecycle
//!
//! 1. `Idle -> Running`, then a single `POST /results` carrying the mission
//!    id and the CRUD API base address.
//! 2. The call is bounded by the configured budget (55 s by default). Expiry
//!    drops the in-flight request.
//! 3. The outcome is classified: success is `Completed`; an upstream 504 or
//!    local expiry is `TimedOut`; anything else is `Failed`. Degraded
//!    outcomes carry a synthesized result text.
//! 4. The mission's `results` are replaced through the composer, whatever
//!    the outcome.
//!
//! `run` never returns an error. Persistence failures are logged and
//! reported through [`MissionRunReport::persisted`].

use std::sync::Arc;
use std::time::Duration;

use crate::application::composer::MissionComposer;
use crate::domain::client_config::ClientConfig;
use crate::domain::execution::{ExecutionError, ExecutionOutcome, MissionRun, MissionRunReport, RunState};
use crate::domain::inference::{ExecutionRequest, InferenceService};
use crate::domain::mission::MissionId;

pub struct ExecutionOrchestrator {
    inference: Arc<dyn InferenceService>,
    composer: Arc<MissionComposer>,
    api_endpoint: String,
    budget: Duration,
}

impl ExecutionOrchestrator {
    pub fn new(inference: Arc<dyn InferenceService>, composer: Arc<MissionComposer>, config: &ClientConfig) -> Self {
        Self {
            inference,
            composer,
            api_endpoint: config.crud_api.base().to_string(),
            budget: config.execution.timeout,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub async fn run(&self, mission_id: &MissionId) -> MissionRunReport {
        let mut run = MissionRun::new(mission_id.clone());
        if let Err(e) = run.start() {
            tracing::warn!(mission_id = %mission_id, "{}", e);
        }
        tracing::info!(mission_id = %mission_id, budget = ?self.budget, "Mission run started");

        let request = ExecutionRequest {
            id: mission_id.clone(),
            api_endpoint: self.api_endpoint.clone(),
        };

        let (state, outcome) = self.execute(&request).await;
        let transition = match state {
            RunState::Completed => run.complete(),
            RunState::TimedOut => run.time_out(),
            _ => run.fail(),
        };
        if let Err(e) = transition {
            tracing::warn!(mission_id = %mission_id, "{}", e);
        }

        let persisted = self.persist(mission_id, &outcome).await;
        tracing::info!(
            mission_id = %mission_id,
            state = %run.state(),
            execution_time = outcome.execution_time,
            outputs = outcome.task_outputs.len(),
            persisted,
            "Mission run finished"
        );

        MissionRunReport {
            mission_id: mission_id.clone(),
            state: run.state(),
            outcome,
            persisted,
        }
    }

    async fn execute(&self, request: &ExecutionRequest) -> (RunState, ExecutionOutcome) {
        match tokio::time::timeout(self.budget, self.inference.run_mission(request)).await {
            Ok(Ok(response)) => (RunState::Completed, ExecutionOutcome::from(response)),
            Ok(Err(e)) if e.is_timeout() => {
                tracing::warn!(mission_id = %request.id, "Execution service timed out upstream");
                (RunState::TimedOut, ExecutionOutcome::timed_out(self.budget))
            }
            Ok(Err(e)) => {
                tracing::warn!(mission_id = %request.id, "Execution failed: {}", e);
                (RunState::Failed, ExecutionOutcome::failed(e))
            }
            Err(_) => {
                tracing::warn!(mission_id = %request.id, "{}", ExecutionError::Timeout(self.budget));
                (RunState::TimedOut, ExecutionOutcome::timed_out(self.budget))
            }
        }
    }

    async fn persist(&self, mission_id: &MissionId, outcome: &ExecutionOutcome) -> bool {
        match self.composer.record_results(mission_id, &outcome.results).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(mission_id = %mission_id, "Could not persist run results: {}", e);
                false
            }
        }
    }
}
