use anyhow::Result;
use clap::{Args, Subcommand};

use reach_client::api::{ApiClient, Campaign, CampaignCreate, CampaignListParams};

use crate::config::ReachConfig;

#[derive(Subcommand)]
pub enum CampaignCommand {
    /// List campaigns
    List(ListArgs),
    /// Create a new campaign
    Create(CreateArgs),
    /// Show one campaign in full
    Show { campaign_id: String },
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (active, draft, completed, paused)
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    offset: Option<u32>,
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    product_name: String,
    #[arg(long)]
    brand_name: String,
    #[arg(long)]
    budget: f64,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    audience: Option<String>,
    #[arg(long)]
    use_cases: Option<String>,
    #[arg(long)]
    goal: Option<String>,
    #[arg(long)]
    niche: Option<String>,
}

pub async fn run(command: CampaignCommand, config: &ReachConfig) -> Result<()> {
    let api = ApiClient::new(&config.api_url)?;

    match command {
        CampaignCommand::List(args) => {
            let campaigns = api
                .list_campaigns(&CampaignListParams {
                    status: args.status,
                    limit: args.limit,
                    offset: args.offset,
                })
                .await?;
            if campaigns.is_empty() {
                println!("No campaigns found.");
                return Ok(());
            }
            println!(
                "{:<38} {:<24} {:<12} {:>12}",
                "ID", "PRODUCT", "STATUS", "BUDGET"
            );
            for campaign in campaigns {
                println!(
                    "{:<38} {:<24} {:<12} {:>12.2}",
                    campaign.id, campaign.product_name, campaign.status, campaign.total_budget
                );
            }
            Ok(())
        }
        CampaignCommand::Create(args) => {
            let campaign = api
                .create_campaign(&CampaignCreate {
                    product_name: args.product_name,
                    brand_name: args.brand_name,
                    product_description: args.description,
                    target_audience: args.audience,
                    key_use_cases: args.use_cases,
                    campaign_goal: args.goal,
                    product_niche: args.niche,
                    total_budget: args.budget,
                })
                .await?;
            println!("Created campaign {} ({})", campaign.id, campaign.status);
            Ok(())
        }
        CampaignCommand::Show { campaign_id } => {
            let campaign = api.get_campaign(&campaign_id).await?;
            print_campaign(&campaign);
            Ok(())
        }
    }
}

fn print_campaign(campaign: &Campaign) {
    println!("{} — {}", campaign.product_name, campaign.brand_name);
    println!("  id:       {}", campaign.id);
    println!("  status:   {}", campaign.status);
    println!("  budget:   {:.2}", campaign.total_budget);
    if let Some(niche) = &campaign.product_niche {
        println!("  niche:    {niche}");
    }
    if let Some(goal) = &campaign.campaign_goal {
        println!("  goal:     {goal}");
    }
    if let Some(audience) = &campaign.target_audience {
        println!("  audience: {audience}");
    }
    if let Some(description) = &campaign.product_description {
        println!("  about:    {description}");
    }
    println!("  created:  {}", campaign.created_at);
    println!("  updated:  {}", campaign.updated_at);
}
