// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire codec for channel frames.
//!
//! Frames are WebSocket text frames carrying a single JSON object. The
//! object's schema belongs to the caller; this module only enforces that
//! inbound frames decode to a key/value mapping.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A decoded inbound message: a JSON object keyed by string.
pub type Payload = Map<String, Value>;

/// Decode a text frame into a [`Payload`].
///
/// Returns [`Error::Decode`] when the frame is not JSON or when it is JSON
/// but not an object.
pub fn decode(frame: &str) -> Result<Payload> {
    match serde_json::from_str::<Value>(frame) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::Decode(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
        Err(e) => Err(Error::Decode(e.to_string())),
    }
}

/// Encode a caller payload into a text frame.
pub fn encode<T: Serialize + ?Sized>(payload: &T) -> Result<String> {
    serde_json::to_string(payload).map_err(|e| Error::Encode(e.to_string()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
