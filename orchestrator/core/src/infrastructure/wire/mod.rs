// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Wire Codec
//!
//! Translation between the CRUD API's tagged-union storage encoding and
//! plain domain entities.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Anti-corruption layer for the storage item format
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | `attribute` | `AttributeValue` sum type and typed field reads with defaults |
//! | `entities` | one `WireEntity` schema per aggregate (encode/decode) |
//! | `envelope` | response envelope and double-encoded list bodies |
//!
//! `T::decode(&x.encode()) == x` holds for every valid entity.

pub mod attribute;
pub mod entities;
pub mod envelope;

pub use attribute::{AttributeValue, FieldReader, WireItem};
pub use entities::WireEntity;
pub use envelope::{decode_list, Envelope};

use crate::domain::repository::RepositoryError;

/// Malformed wire payload. Read paths treat this as "no data".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Response envelope is not valid JSON: {0}")]
    Envelope(String),

    #[error("Envelope body is not a JSON array of items: {0}")]
    Body(String),

    #[error("Item is not a map of tagged values: {0}")]
    Item(String),

    #[error("Required field '{0}' is missing")]
    MissingField(&'static str),

    #[error("Field '{field}' expected tag {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },
}

impl From<CodecError> for RepositoryError {
    fn from(err: CodecError) -> Self {
        RepositoryError::Codec(err.to_string())
    }
}
