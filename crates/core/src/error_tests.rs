// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    decode = { Error::Decode("expected value".into()), "malformed frame" },
    encode = { Error::Encode("key must be a string".into()), "key must be a string" },
    config = { Error::Config("bad interval".into()), "bad interval" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_invalid_endpoint_has_hint() {
    let msg = Error::InvalidEndpoint("http://example.com".into()).to_string();
    assert!(msg.contains("http://example.com"));
    assert!(msg.contains("hint: endpoints must start with ws:// or wss://"));
}
