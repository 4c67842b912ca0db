// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    config_not_found = { Error::ConfigNotFound("/tmp/missing.toml".into()), "/tmp/missing.toml" },
    config = { Error::Config("bad value".into()), "config error: bad value" },
    connection_failed = { Error::ConnectionFailed { attempts: 5 }, "after 5 reconnect attempts" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_from_core_is_transparent() {
    let err: Error = relink_core::Error::InvalidEndpoint("http://x".into()).into();
    assert!(matches!(err, Error::Core(_)));
    assert!(err.to_string().starts_with("invalid endpoint 'http://x'"));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
