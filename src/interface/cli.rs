//! # Command Line
//!
//! Flag definitions and the merge of flags, config file and defaults into the
//! settings of a single run.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::application::engine::{AgentSettings, DEFAULT_MAX_TURNS};
use crate::domain::config::AppConfig;
use crate::infrastructure::llm::{ProviderError, ProviderKind};
use crate::infrastructure::llm::providers::ProviderSettings;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Parser, Debug)]
#[command(name = "opsloop", version, about = "Minimal JSON-operation coding agent")]
pub struct Cli {
    /// Model provider: openai, anthropic, gemini, xai [default: openai]
    #[arg(long)]
    pub provider: Option<String>,

    /// Model name [default: gpt-3.5-turbo]
    #[arg(long)]
    pub model: Option<String>,

    /// Task prompt
    #[arg(long, default_value = "")]
    pub prompt: String,

    /// Turns allowed before giving up [default: 20]
    #[arg(long)]
    pub max_turns: Option<u32>,

    /// Directory for shell commands and relative file paths
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a session log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Everything one run needs, after precedence has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub provider: ProviderKind,
    pub provider_settings: ProviderSettings,
    pub agent: AgentSettings,
    pub prompt: String,
    pub workdir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn load_config(&self) -> Result<AppConfig> {
        match &self.config {
            Some(path) => AppConfig::load(path),
            None => Ok(AppConfig::default()),
        }
    }

    /// Flags win over the config file, which wins over built-in defaults.
    ///
    /// An unknown `--provider` name is a provider failure, not a usage error.
    pub fn into_settings(self, config: AppConfig) -> Result<RunSettings, ProviderError> {
        let provider = match self.provider.as_deref() {
            Some(name) => ProviderKind::from_name(name)?,
            None => config.provider.unwrap_or(ProviderKind::OpenAI),
        };

        Ok(RunSettings {
            provider,
            provider_settings: config.provider_settings(provider),
            agent: AgentSettings {
                model: self
                    .model
                    .or(config.model)
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_turns: self
                    .max_turns
                    .or(config.max_turns)
                    .unwrap_or(DEFAULT_MAX_TURNS),
            },
            prompt: self.prompt,
            workdir: self.workdir.or(config.workdir),
            log_file: self.log_file.or(config.log_file),
        })
    }
}
