// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! crewdeck core
//!
//! Agents, tasks and missions stored behind a CRUD API, and mission runs
//! against an external execution service.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Domain model, use cases and HTTP adapters

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
