// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain Layer
//!
//! Entities, value objects and the ports implemented by infrastructure.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Agents, tasks, missions and mission runs

pub mod agent;
pub mod task;
pub mod mission;
pub mod execution;
pub mod inference;
pub mod identity;
pub mod validation;
pub mod repository;
pub mod client_config;
