// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Service wiring for CLI commands
//!
//! Loads the client configuration and builds the HTTP adapters and
//! application services in-process. Nothing is shared between invocations.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crewdeck_core::application::{
    builtin_examples, AgentService, ExampleCatalog, ExecutionOrchestrator, MissionComposer, MissionService,
    TaskService,
};
use crewdeck_core::domain::client_config::ClientConfig;
use crewdeck_core::infrastructure::{HttpInferenceClient, HttpStoreClient};

pub struct AppServices {
    pub config: ClientConfig,
    pub agents: Arc<AgentService>,
    pub tasks: Arc<TaskService>,
    pub missions: Arc<MissionService>,
    pub composer: Arc<MissionComposer>,
    pub orchestrator: ExecutionOrchestrator,
    pub catalog: ExampleCatalog,
}

impl AppServices {
    pub fn connect(config_path: Option<PathBuf>) -> Result<Self> {
        let config = ClientConfig::load_or_default(config_path).context("Failed to load configuration")?;
        config.validate().context("Configuration validation failed")?;
        Self::from_config(config)
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let store = Arc::new(HttpStoreClient::new(&config)?);
        let inference = Arc::new(HttpInferenceClient::new(&config)?);

        let agents = Arc::new(AgentService::new(store.clone()));
        let tasks = Arc::new(TaskService::new(store.clone()));
        let missions = Arc::new(MissionService::new(store));
        let composer = Arc::new(MissionComposer::new(agents.clone(), tasks.clone(), missions.clone()));
        let orchestrator = ExecutionOrchestrator::new(inference, composer.clone(), &config);

        let examples = builtin_examples().context("Failed to parse built-in examples")?;
        let catalog = ExampleCatalog::new(examples, agents.clone(), tasks.clone(), missions.clone());

        tracing::debug!(
            crud_api = %config.crud_api.base(),
            inference_api = %config.inference_api.base(),
            timeout = ?config.execution.timeout,
            "Services ready"
        );

        Ok(Self {
            config,
            agents,
            tasks,
            missions,
            composer,
            orchestrator,
            catalog,
        })
    }
}
