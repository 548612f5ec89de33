// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Application Layer
//!
//! Use cases over the domain: entity services with pre-write validation, the
//! mission composer, the execution orchestrator and the example catalog.
//!
//! # Architecture
//!
//! - **Layer:** Application
//! - **Purpose:** Coordinate domain objects and store/inference adapters

pub mod errors;
pub mod agents;
pub mod tasks;
pub mod missions;
pub mod composer;
pub mod orchestrator;
pub mod catalog;

pub use agents::AgentService;
pub use catalog::{builtin_examples, ExampleCatalog, ExampleStatus, LoadedExample};
pub use composer::{resolve_agents, resolve_tasks, EditState, MissionComposer, MissionView};
pub use errors::{CatalogError, ComposerError, ServiceError};
pub use missions::MissionService;
pub use orchestrator::ExecutionOrchestrator;
pub use tasks::TaskService;
