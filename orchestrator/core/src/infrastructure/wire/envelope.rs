// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Response envelopes
//!
//! CRUD API responses are function-proxy envelopes:
//! `{"statusCode": 200, "body": "<json>", "headers": {...}}`. For list calls
//! `body` is itself a JSON-encoded array of tagged items, so decoding goes
//! through two JSON layers.

use serde::Deserialize;

use super::attribute::WireItem;
use super::entities::WireEntity;
use super::CodecError;

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "statusCode", default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub body: serde_json::Value,
}

impl Envelope {
    pub fn parse(raw: &str) -> Result<Self, CodecError> {
        serde_json::from_str(raw).map_err(|e| CodecError::Envelope(e.to_string()))
    }

    /// Status reported inside the envelope, if it signals failure.
    pub fn error_status(&self) -> Option<u16> {
        self.status_code.filter(|status| *status >= 400)
    }

    /// The envelope body as text, for error messages.
    pub fn body_text(&self) -> String {
        match &self.body {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Items carried in the body. A JSON-encoded string is decoded once
    /// more; an already-decoded array is accepted as is.
    pub fn items(&self) -> Result<Vec<serde_json::Value>, CodecError> {
        let array = match &self.body {
            serde_json::Value::String(encoded) => {
                serde_json::from_str::<serde_json::Value>(encoded).map_err(|e| CodecError::Body(e.to_string()))?
            }
            other => other.clone(),
        };

        match array {
            serde_json::Value::Array(items) => Ok(items),
            other => Err(CodecError::Body(format!("expected an array of items, found {}", json_kind(&other)))),
        }
    }

    /// Decodes every item as `T`. Items that fail to decode are skipped and
    /// logged so one corrupt row does not hide the rest of the collection.
    pub fn decode_items<T: WireEntity>(&self) -> Result<Vec<T>, CodecError> {
        let items = self.items()?;
        let mut decoded = Vec::with_capacity(items.len());

        for (index, value) in items.into_iter().enumerate() {
            let result = serde_json::from_value::<WireItem>(value)
                .map_err(|e| CodecError::Item(e.to_string()))
                .and_then(|item| T::decode(&item));

            match result {
                Ok(entity) => decoded.push(entity),
                Err(e) => tracing::warn!(
                    collection = T::COLLECTION,
                    index,
                    "Skipping undecodable item: {}",
                    e
                ),
            }
        }

        Ok(decoded)
    }
}

/// Parses a raw list response into entities.
pub fn decode_list<T: WireEntity>(raw: &str) -> Result<Vec<T>, CodecError> {
    Envelope::parse(raw)?.decode_items()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
