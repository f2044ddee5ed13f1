mod cli;
mod config;
mod error;
mod filename;
mod gemini;
mod indexer;
mod ingestor;
mod metadata;
mod orchestrator;
mod processor;
mod router;
mod state_machine;
mod suggestion;
mod ui;
mod vault;

use anyhow::{Context, Result, bail};
use clap::Parser;

use cli::{Cli, Command};
use config::GardenerConfig;
use gemini::GeminiClient;
use orchestrator::Pipeline;
use vault::Vault;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = GardenerConfig::load().context("failed to load configuration")?;
    if let Some(vault_root) = cli.vault {
        config.vault_root = vault_root;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }

    let vault = Vault::new(config.vault_root.as_str());

    match cli.command {
        Command::Run { dry_run } => {
            config.dry_run = config.dry_run || dry_run;
            if config.api_key.is_empty() {
                bail!(
                    "no API key configured; set GEMINI_API_KEY or api_key in gardener.toml"
                );
            }
            vault
                .ensure_layout()
                .context("failed to create vault layout")?;

            if config.dry_run {
                println!("Dry run: no files will be moved or modified.\n");
            }

            let client = GeminiClient::new(config.api_key.clone());
            let pipeline = Pipeline::new(client, vault, &config);
            let report = pipeline.run().await?;

            ui::print_summary(report.placed(), report.failed(), report.forced_triage);
        }
        Command::Status => {
            let jobs = ingestor::scan_inbox(&vault).context("failed to read the inbox")?;
            if jobs.is_empty() {
                println!("Inbox is empty.");
            } else {
                for job in &jobs {
                    println!("{} ({})", job.display_name, job.content_kind);
                }
                println!("\n{} file(s) awaiting triage", jobs.len());
            }
        }
        Command::Folders => {
            for folder in vault.known_folders() {
                println!("{folder}");
            }
        }
    }

    Ok(())
}
