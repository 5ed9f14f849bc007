use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{campaign, creators, outreach, trigger};

#[derive(Parser)]
#[command(name = "reach", version, about = "Influencer campaign tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage campaigns
    Campaign {
        #[command(subcommand)]
        command: campaign::CampaignCommand,
    },
    /// Search creator profiles
    Creators {
        #[command(subcommand)]
        command: creators::CreatorsCommand,
    },
    /// Track and act on outreach entries
    Outreach {
        #[command(subcommand)]
        command: outreach::OutreachCommand,
    },
    /// Trigger a campaign agent run and stream its logs
    Trigger(trigger::TriggerArgs),
    /// Show or update client configuration
    Config {
        #[command(subcommand)]
        command: commands::config_cmd::ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { command } => commands::config_cmd::run(command),
        Commands::Campaign { command } => campaign::run(command, &config::load()?).await,
        Commands::Creators { command } => creators::run(command, &config::load()?).await,
        Commands::Outreach { command } => outreach::run(command, &config::load()?).await,
        Commands::Trigger(args) => trigger::run(args, &config::load()?).await,
    }
}
