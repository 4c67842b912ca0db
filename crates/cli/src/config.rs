// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration file management.
//!
//! Configuration is read from TOML:
//!
//! ```toml
//! [channel]
//! endpoint = "ws://localhost:7890"
//! reconnect_interval_ms = 3000
//! max_reconnect_attempts = 5
//! ```
//!
//! Without an explicit path, `./relink.toml` is tried first, then
//! `<config dir>/relink/config.toml`. Missing files mean defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use relink_core::ChannelConfig;

use crate::error::{Error, Result};

const LOCAL_CONFIG_FILE_NAME: &str = "relink.toml";
const CONFIG_DIR_NAME: &str = "relink";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Contents of a relink configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Channel settings. Every field has a default.
    #[serde(default)]
    pub channel: ChannelConfig,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub reconnect_interval_ms: Option<u64>,
    pub max_reconnect_attempts: Option<u32>,
}

impl Config {
    /// Load configuration from `path`, or from the default locations.
    ///
    /// An explicit path that does not exist is an error; missing default
    /// files are not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(Error::ConfigNotFound(path.display().to_string()));
                }
                Self::read(path)
            }
            None => {
                let cwd = std::env::current_dir()?;
                match find_config_file(&cwd, dirs::config_dir().as_deref()) {
                    Some(path) => Self::read(&path),
                    None => Ok(Config::default()),
                }
            }
        }
    }

    /// Read and parse a configuration file.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))
    }

    /// Apply command-line overrides, then validate the channel settings.
    pub fn resolve(mut self, overrides: Overrides) -> Result<ChannelConfig> {
        if let Some(endpoint) = overrides.endpoint {
            self.channel.endpoint = endpoint;
        }
        if let Some(ms) = overrides.reconnect_interval_ms {
            self.channel.reconnect_interval_ms = ms;
        }
        if let Some(attempts) = overrides.max_reconnect_attempts {
            self.channel.max_reconnect_attempts = attempts;
        }
        self.channel.validate()?;
        Ok(self.channel)
    }
}

/// Find the configuration file to use when none was given explicitly.
pub fn find_config_file(cwd: &Path, config_dir: Option<&Path>) -> Option<PathBuf> {
    let local = cwd.join(LOCAL_CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    let user = config_dir?.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
    user.is_file().then_some(user)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
