// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Mission Execution
//!
//! State machine and result types for one run of a mission against the
//! external execution service.
//!
//! ```text
//! Idle ──start──▶ Running ──complete──▶ Completed
//!                    │ ├────time_out──▶ TimedOut
//!                    │ └────fail──────▶ Failed
//! ```
//!
//! Every run ends in exactly one terminal state and always carries an
//! [`ExecutionOutcome`]; degraded outcomes are synthesized locally so callers
//! never see a transport failure.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::domain::inference::ExecutionResponse;
use crate::domain::mission::MissionId;

/// Result text used when the run exceeded the timeout budget.
pub const TIMEOUT_MESSAGE: &str =
    "Request timed out. The mission is too complex for the current timeout settings.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    TimedOut,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::TimedOut | RunState::Failed)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::TimedOut => "timed out",
            RunState::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Invalid run transition from {from} to {to}")]
    InvalidTransition { from: RunState, to: RunState },

    #[error("Execution exceeded the {0:?} budget")]
    Timeout(Duration),
}

/// One run of a mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionRun {
    pub mission_id: MissionId,
    state: RunState,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl MissionRun {
    pub fn new(mission_id: MissionId) -> Self {
        Self {
            mission_id,
            state: RunState::Idle,
            started_at: None,
            ended_at: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn start(&mut self) -> Result<(), ExecutionError> {
        self.transition(RunState::Idle, RunState::Running)?;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), ExecutionError> {
        self.finish(RunState::Completed)
    }

    pub fn time_out(&mut self) -> Result<(), ExecutionError> {
        self.finish(RunState::TimedOut)
    }

    pub fn fail(&mut self) -> Result<(), ExecutionError> {
        self.finish(RunState::Failed)
    }

    fn finish(&mut self, to: RunState) -> Result<(), ExecutionError> {
        self.transition(RunState::Running, to)?;
        self.ended_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, expected: RunState, to: RunState) -> Result<(), ExecutionError> {
        if self.state != expected {
            return Err(ExecutionError::InvalidTransition { from: self.state, to });
        }
        self.state = to;
        Ok(())
    }
}

/// What a run produced, successful or synthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Aggregate result text
    pub results: String,
    /// One entry per executed task, in mission task order
    pub task_outputs: Vec<TaskOutput>,
    /// Seconds
    pub execution_time: f64,
}

impl ExecutionOutcome {
    pub fn timed_out(budget: Duration) -> Self {
        Self {
            results: TIMEOUT_MESSAGE.to_string(),
            task_outputs: Vec::new(),
            execution_time: budget.as_secs_f64(),
        }
    }

    pub fn failed(message: impl std::fmt::Display) -> Self {
        Self {
            results: format!("Error: {}", message),
            task_outputs: Vec::new(),
            execution_time: 0.0,
        }
    }
}

impl From<ExecutionResponse> for ExecutionOutcome {
    fn from(response: ExecutionResponse) -> Self {
        Self {
            results: response.results,
            task_outputs: response.task_outputs.iter().map(|raw| TaskOutput::parse(raw)).collect(),
            execution_time: response.execution_time,
        }
    }
}

/// What a finished run hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionRunReport {
    pub mission_id: MissionId,
    pub state: RunState,
    pub outcome: ExecutionOutcome,
    /// Whether the reconciled mission was saved
    pub persisted: bool,
}

/// Output of a single task. The execution service sends each output as a
/// JSON string `{"type": "image"|"text", "data": ...}`; anything else is
/// treated as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum TaskOutput {
    Image(String),
    Text(String),
}

impl TaskOutput {
    /// Classifies a raw output string. Never fails.
    pub fn parse(raw: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(_) => return TaskOutput::Text(raw.to_string()),
        };

        let kind = value.get("type").and_then(|t| t.as_str());
        let data = value.get("data").and_then(|d| d.as_str());
        match (kind, data) {
            (Some("image"), Some(data)) => TaskOutput::Image(data.to_string()),
            (Some("text"), Some(data)) => TaskOutput::Text(data.to_string()),
            _ => TaskOutput::Text(raw.to_string()),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, TaskOutput::Image(_))
    }

    pub fn data(&self) -> &str {
        match self {
            TaskOutput::Image(data) | TaskOutput::Text(data) => data,
        }
    }

    /// A `data:` URL for image outputs.
    pub fn data_url(&self) -> Option<String> {
        match self {
            TaskOutput::Image(data) => Some(ImageFormat::sniff(data).data_url(data)),
            TaskOutput::Text(_) => None,
        }
    }

    /// Decoded image bytes, if this is an image with valid base64 payload.
    pub fn decode_image(&self) -> Option<Vec<u8>> {
        let TaskOutput::Image(data) = self else {
            return None;
        };
        let payload = match data.split_once(";base64,") {
            Some((_, payload)) if data.starts_with("data:") => payload,
            _ => data.as_str(),
        };
        base64::engine::general_purpose::STANDARD.decode(payload.trim()).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Already a `data:` URL
    DataUrl,
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Recognizes base64 JPEG and PNG signatures; unknown payloads are
    /// assumed to be PNG.
    pub fn sniff(data: &str) -> Self {
        if data.starts_with("data:") {
            ImageFormat::DataUrl
        } else if data.starts_with("/9j/") {
            ImageFormat::Jpeg
        } else {
            ImageFormat::Png
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png | ImageFormat::DataUrl => "png",
        }
    }

    pub fn data_url(&self, data: &str) -> String {
        match self {
            ImageFormat::DataUrl => data.to_string(),
            ImageFormat::Jpeg => format!("data:image/jpeg;base64,{}", data),
            ImageFormat::Png => format!("data:image/png;base64,{}", data),
        }
    }
}
