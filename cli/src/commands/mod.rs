// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the crewdeck CLI

pub mod agent;
pub mod config;
pub mod examples;
pub mod mission;
pub mod task;

pub use self::agent::AgentCommand;
pub use self::config::ConfigCommand;
pub use self::examples::ExamplesCommand;
pub use self::mission::MissionCommand;
pub use self::task::TaskCommand;

use anyhow::anyhow;
use colored::Colorize;

use crewdeck_core::application::ServiceError;
use crewdeck_core::domain::repository::DeleteReport;

/// Validation failures are shown as-is; store failures get request context.
pub(crate) fn service_error(err: ServiceError) -> anyhow::Error {
    match err {
        ServiceError::Validation(e) => anyhow!("{}", e),
        ServiceError::Repository(e) => anyhow::Error::new(e).context("CRUD API request failed"),
    }
}

pub(crate) fn report_delete(kind: &str, report: &DeleteReport) {
    if report.is_clean() {
        println!(
            "{}",
            format!("✓ Deleted {} {}(s)", report.succeeded(), kind).green()
        );
    } else {
        println!(
            "{}",
            format!(
                "⚠ Deleted {} of {} {}(s), {} failed",
                report.succeeded(),
                report.requested,
                kind,
                report.failed
            )
            .yellow()
        );
    }
}
