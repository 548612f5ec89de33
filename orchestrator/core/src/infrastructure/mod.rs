// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Infrastructure Layer
//!
//! Adapters behind the domain's store and inference traits.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Pattern:** Adapter (Hexagonal Architecture)

pub mod wire;
pub mod http_store;
pub mod in_memory;
pub mod inference_client;

pub use http_store::HttpStoreClient;
pub use in_memory::InMemoryStoreClient;
pub use inference_client::HttpInferenceClient;
