//! # Main Entry Point
//!
//! Wires the layers together for a single agent run:
//! - Interface: flags, config precedence, status reporting
//! - Infrastructure: provider gateway, operation executor
//! - Application: agent loop, reply parsing, logging

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::Result;
use clap::Parser;

use crate::application::engine::Agent;
use crate::application::logging;
use crate::infrastructure::llm::providers;
use crate::infrastructure::tools::executor::Executor;
use crate::interface::cli::Cli;
use crate::interface::report::status_line;
use crate::strings::messages;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version exit 0; every other usage error exits 1.
            e.print()?;
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    if cli.prompt.is_empty() {
        println!("{}", messages::PROMPT_REQUIRED);
        std::process::exit(1);
    }

    // 1. Load Configuration
    let config = cli.load_config()?;
    let settings = match cli.into_settings(config) {
        Ok(settings) => settings,
        Err(e) => {
            println!("{}", messages::provider_failed(&e.to_string()));
            return Ok(());
        }
    };

    // 2. Logging Setup
    let _guard = logging::init(settings.log_file.as_deref())?;

    // 3. Provider (credential is resolved here, before any request)
    let provider = match providers::build(settings.provider, &settings.provider_settings) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::error!(provider = %settings.provider, error = %e, "provider unavailable");
            println!("{}", messages::provider_failed(&e.to_string()));
            return Ok(());
        }
    };

    // 4. Run
    let max_turns = settings.agent.max_turns;
    let agent = Agent::new(provider, Executor::new(settings.workdir), settings.agent);
    let report = agent.run(&settings.prompt).await?;

    tracing::info!(turns = report.turns, messages = report.conversation.len(), "run finished");
    println!("{}", status_line(&report.outcome, max_turns));

    Ok(())
}
