// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for relink-core operations.

use thiserror::Error;

/// All possible errors that can occur in relink-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed frame: {0}")]
    Decode(String),

    #[error("cannot encode payload: {0}")]
    Encode(String),

    #[error("invalid endpoint '{0}'\n  hint: endpoints must start with ws:// or wss://")]
    InvalidEndpoint(String),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for relink-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
