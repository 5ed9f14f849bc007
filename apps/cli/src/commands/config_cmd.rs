use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::{self, ReachConfig};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration and where it came from
    Show,
    /// Write backend URLs to the config file
    Set(SetArgs),
}

#[derive(Args)]
pub struct SetArgs {
    #[arg(long)]
    api_url: String,
    #[arg(long)]
    agent_url: String,
}

pub fn run(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let path = config::config_path()?;
            match config::load() {
                Ok(resolved) => {
                    println!("api_url:   {}", resolved.api_url);
                    println!("agent_url: {}", resolved.agent_url);
                    println!("file:      {}", path.display());
                }
                Err(err) => println!("{err}"),
            }
            Ok(())
        }
        ConfigCommand::Set(args) => {
            let config = ReachConfig {
                api_url: args.api_url,
                agent_url: args.agent_url,
            };
            config::save(&config)?;
            println!("Wrote {}", config::config_path()?.display());
            Ok(())
        }
    }
}
