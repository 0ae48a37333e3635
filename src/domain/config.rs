//! # Configuration
//!
//! Optional YAML configuration file. Every key may be omitted; command-line
//! flags take precedence over the file, and the file over built-in defaults.
//!
//! ```yaml
//! provider: anthropic
//! model: claude-3-5-sonnet-20241022
//! max_turns: 20
//! workdir: ./scratch
//! log_file: data/session.log
//! providers:
//!   anthropic:
//!     endpoint: https://api.anthropic.com
//!     timeout: 120
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::infrastructure::llm::ProviderKind;
use crate::infrastructure::llm::providers::ProviderSettings;

/// Main application configuration structure.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: Option<ProviderKind>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub max_turns: Option<u32>,
    #[serde(default)]
    pub workdir: Option<PathBuf>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub providers: HashMap<ProviderKind, ProviderEntry>,
}

/// Endpoint overrides for one provider.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProviderEntry {
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        // An empty file deserializes to unit, not a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn provider_settings(&self, kind: ProviderKind) -> ProviderSettings {
        self.providers
            .get(&kind)
            .map(|entry| ProviderSettings {
                endpoint: entry.endpoint.clone(),
                timeout: entry.timeout,
            })
            .unwrap_or_default()
    }
}
