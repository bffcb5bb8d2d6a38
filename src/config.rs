// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.tallybook", "Tallybook", "tallybook"));

pub const ENV_API_URL: &str = "TALLYBOOK_API_URL";
pub const ENV_TIMEOUT: &str = "TALLYBOOK_TIMEOUT_SECS";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Deployed web-app URL of the spreadsheet store.
    pub api_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn api_url(&self) -> Result<&str> {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No store URL configured (use --api-url, {} or apiUrl in config.json)",
                    ENV_API_URL
                )
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    Ok(proj.config_dir().join("config.json"))
}

pub fn load() -> Result<Config> {
    let path = config_path()?;
    let text = if path.exists() {
        Some(
            fs::read_to_string(&path)
                .with_context(|| format!("Read config at {}", path.display()))?,
        )
    } else {
        None
    };
    from_sources(text.as_deref(), |k| std::env::var(k).ok())
}

/// Layer the config file (if any) under environment overrides.
pub fn from_sources(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let mut cfg: Config = match file {
        Some(text) => serde_json::from_str(text).context("Invalid config.json")?,
        None => Config::default(),
    };
    if let Some(url) = env(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
        cfg.api_url = Some(url.trim().to_string());
    }
    if let Some(t) = env(ENV_TIMEOUT) {
        cfg.timeout_secs = t
            .trim()
            .parse()
            .with_context(|| format!("Invalid {} '{}'", ENV_TIMEOUT, t))?;
    }
    Ok(cfg)
}
