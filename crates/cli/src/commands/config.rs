// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::config::Config;
use crate::error::Result;

/// Print the configuration that `relink connect` would start from.
pub fn run(path: Option<&Path>) -> Result<()> {
    print!("{}", render(path)?);
    Ok(())
}

fn render(path: Option<&Path>) -> Result<String> {
    Config::load(path)?.to_toml()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
