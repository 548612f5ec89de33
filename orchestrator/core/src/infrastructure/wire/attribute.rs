// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Tagged attribute values
//!
//! Every stored leaf is wrapped with its type discriminator, e.g.
//! `{"S": "Writer"}`, `{"BOOL": false}`, `{"L": [{"S": "12"}]}`,
//! `{"N": "3.5"}`. Numbers travel as decimal strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CodecError;

/// One stored item: field name to tagged value.
pub type WireItem = BTreeMap<String, AttributeValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    S(String),
    #[serde(rename = "BOOL")]
    Bool(bool),
    L(Vec<AttributeValue>),
    N(String),
}

impl AttributeValue {
    pub fn tag(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::Bool(_) => "BOOL",
            AttributeValue::L(_) => "L",
            AttributeValue::N(_) => "N",
        }
    }

    pub fn string_list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeValue::L(values.into_iter().map(|v| AttributeValue::S(v.into())).collect())
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::S(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::S(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

/// Typed field access over a [`WireItem`]. Absent fields take their
/// documented defaults; present fields with the wrong tag are errors.
pub struct FieldReader<'a> {
    item: &'a WireItem,
}

impl<'a> FieldReader<'a> {
    pub fn new(item: &'a WireItem) -> Self {
        Self { item }
    }

    /// A string field that must be present and non-empty.
    pub fn required_string(&self, field: &'static str) -> Result<String, CodecError> {
        match self.item.get(field) {
            None => Err(CodecError::MissingField(field)),
            Some(AttributeValue::S(s)) if s.is_empty() => Err(CodecError::MissingField(field)),
            Some(AttributeValue::S(s)) => Ok(s.clone()),
            Some(other) => Err(mismatch(field, "S", other)),
        }
    }

    /// String field, `""` when absent.
    pub fn string(&self, field: &'static str) -> Result<String, CodecError> {
        match self.item.get(field) {
            None => Ok(String::new()),
            Some(AttributeValue::S(s)) => Ok(s.clone()),
            Some(other) => Err(mismatch(field, "S", other)),
        }
    }

    /// Boolean field, `false` when absent.
    pub fn bool(&self, field: &'static str) -> Result<bool, CodecError> {
        match self.item.get(field) {
            None => Ok(false),
            Some(AttributeValue::Bool(b)) => Ok(*b),
            Some(other) => Err(mismatch(field, "BOOL", other)),
        }
    }

    /// List of strings, `[]` when absent.
    pub fn string_list(&self, field: &'static str) -> Result<Vec<String>, CodecError> {
        match self.item.get(field) {
            None => Ok(Vec::new()),
            Some(AttributeValue::L(values)) => values
                .iter()
                .map(|v| match v {
                    AttributeValue::S(s) => Ok(s.clone()),
                    other => Err(mismatch(field, "S", other)),
                })
                .collect(),
            Some(other) => Err(mismatch(field, "L", other)),
        }
    }

    /// Numeric field, `0` when absent.
    pub fn number(&self, field: &'static str) -> Result<f64, CodecError> {
        match self.item.get(field) {
            None => Ok(0.0),
            Some(AttributeValue::N(n)) => n.trim().parse().map_err(|_| CodecError::TypeMismatch {
                field: field.to_string(),
                expected: "N",
                found: format!("unparseable number '{}'", n),
            }),
            Some(other) => Err(mismatch(field, "N", other)),
        }
    }
}

fn mismatch(field: &str, expected: &'static str, found: &AttributeValue) -> CodecError {
    CodecError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.tag().to_string(),
    }
}
