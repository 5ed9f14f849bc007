use anyhow::Result;
use clap::{Args, Subcommand};

use reach_client::api::{ApiClient, Creator, CreatorSearchParams};

use crate::config::ReachConfig;

#[derive(Subcommand)]
pub enum CreatorsCommand {
    /// Search creator profiles
    List(SearchArgs),
    /// Show one creator profile in full
    Show { creator_id: String },
}

#[derive(Args)]
pub struct SearchArgs {
    /// Match against creator names
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    platform: Option<String>,
    #[arg(long)]
    niche: Option<String>,
    #[arg(long)]
    min_followers: Option<u64>,
    #[arg(long)]
    max_followers: Option<u64>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    language: Option<String>,
    /// Minimum engagement rate percentage
    #[arg(long)]
    min_engagement: Option<f64>,
    #[arg(long, default_value_t = 20)]
    limit: u32,
    #[arg(long)]
    offset: Option<u32>,
}

pub async fn run(command: CreatorsCommand, config: &ReachConfig) -> Result<()> {
    let api = ApiClient::new(&config.api_url)?;

    match command {
        CreatorsCommand::List(args) => {
            let response = api
                .search_creators(&CreatorSearchParams {
                    search: args.search,
                    platform: args.platform,
                    niche: args.niche,
                    min_followers: args.min_followers,
                    max_followers: args.max_followers,
                    country: args.country,
                    language: args.language,
                    min_engagement: args.min_engagement,
                    limit: Some(args.limit),
                    offset: args.offset,
                })
                .await?;

            if response.creators.is_empty() {
                println!("No creators matched.");
                return Ok(());
            }

            println!(
                "{:<24} {:<12} {:<16} {:>12} {:>8}",
                "NAME", "PLATFORM", "NICHE", "FOLLOWERS", "ENG%"
            );
            for creator in &response.creators {
                println!(
                    "{:<24} {:<12} {:<16} {:>12} {:>8.2}",
                    creator.name,
                    creator.platform,
                    creator.niche,
                    creator.followers_count,
                    creator.engagement_rate
                );
            }
            println!("{} of {} shown", response.creators.len(), response.total);
            Ok(())
        }
        CreatorsCommand::Show { creator_id } => {
            let creator = api.get_creator(&creator_id).await?;
            print_creator(&creator);
            Ok(())
        }
    }
}

fn print_creator(creator: &Creator) {
    println!("{} ({})", creator.name, creator.platform);
    println!("  id:         {}", creator.id);
    println!("  email:      {}", creator.email);
    if let Some(channel) = &creator.channel_name {
        println!("  channel:    {channel}");
    }
    println!("  followers:  {}", creator.followers_count);
    println!("  engagement: {:.2}%", creator.engagement_rate);
    println!("  niche:      {}", creator.niche);
    println!("  country:    {}", creator.country);
    println!("  language:   {}", creator.language);
    if let Some(rate) = creator.collaboration_rate {
        println!("  rate:       {rate:.2}");
    }
    if let Some(about) = &creator.about {
        println!("  about:      {about}");
    }
}
