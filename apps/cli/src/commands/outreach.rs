use anyhow::Result;
use clap::{Args, Subcommand};

use reach_client::api::{ApiClient, CallAnalysis, OutreachRecord};

use crate::config::ReachConfig;

#[derive(Subcommand)]
pub enum OutreachCommand {
    /// List outreach entries, optionally scoped to one campaign
    List(ListArgs),
    /// Show one outreach record with its call analysis fields
    Show { outreach_id: String },
    /// Show the AI-derived analysis of a completed call
    Analysis { conversation_id: String },
    /// Initiate an agent call for an outreach entry
    Call {
        outreach_id: String,
        phone_number: String,
    },
    /// Send an outreach email
    Email { outreach_id: String },
}

#[derive(Args)]
pub struct ListArgs {
    /// Restrict to outreach for one campaign
    #[arg(long)]
    campaign: Option<String>,
}

pub async fn run(command: OutreachCommand, config: &ReachConfig) -> Result<()> {
    let api = ApiClient::new(&config.api_url)?;

    match command {
        OutreachCommand::List(args) => match args.campaign {
            Some(campaign_id) => {
                let records = api.list_campaign_outreach(&campaign_id).await?;
                if records.is_empty() {
                    println!("No outreach for campaign {campaign_id}.");
                    return Ok(());
                }
                println!(
                    "{:<38} {:<38} {:<10} {:<12} {:<20}",
                    "ID", "CREATOR", "CHANNEL", "STATUS", "TIMESTAMP"
                );
                for record in records {
                    println!(
                        "{:<38} {:<38} {:<10} {:<12} {:<20}",
                        record.id,
                        record.creator_id,
                        record.channel,
                        record.status,
                        record.timestamp
                    );
                }
                Ok(())
            }
            None => {
                let entries = api.list_outreach().await?;
                if entries.is_empty() {
                    println!("No outreach entries.");
                    return Ok(());
                }
                println!(
                    "{:<38} {:<38} {:<12} {:<20} {:>6}",
                    "ID", "CREATOR", "STATUS", "LAST CONTACT", "CONVS"
                );
                for entry in entries {
                    println!(
                        "{:<38} {:<38} {:<12} {:<20} {:>6}",
                        entry.id,
                        entry.creator_id,
                        entry.status,
                        entry.last_contact,
                        entry.conversations.len()
                    );
                }
                Ok(())
            }
        },
        OutreachCommand::Show { outreach_id } => {
            let record = api.get_outreach(&outreach_id).await?;
            print_record(&record);
            Ok(())
        }
        OutreachCommand::Analysis { conversation_id } => {
            let analysis = api.get_call_analysis(&conversation_id).await?;
            print_analysis(&analysis);
            Ok(())
        }
        OutreachCommand::Call {
            outreach_id,
            phone_number,
        } => {
            let response = api.initiate_call(&outreach_id, &phone_number).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        OutreachCommand::Email { outreach_id } => {
            let response = api.send_email(&outreach_id).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}

fn print_record(record: &OutreachRecord) {
    println!("Outreach {} ({} via {})", record.id, record.status, record.channel);
    println!("  campaign:  {}", record.campaign_id);
    println!("  creator:   {}", record.creator_id);
    println!("  timestamp: {}", record.timestamp);
    if let Some(conversation_id) = &record.conversation_id {
        println!("  conversation: {conversation_id}");
    }
    if let Some(duration) = record.call_duration_seconds {
        println!("  call duration: {duration:.0}s");
    }
    if let Some(summary) = &record.transcript_summary {
        println!("  summary: {summary}");
    }
    if let Some(interest) = &record.interest_level {
        println!("  interest: {interest}");
    }
    if let Some(rate) = &record.collaboration_rate {
        println!("  quoted rate: {rate}");
    }
    if let Some(actions) = &record.follow_up_actions {
        for action in actions {
            println!("  follow-up: {action}");
        }
    }
}

fn print_analysis(analysis: &CallAnalysis) {
    println!(
        "Call {} — {} ({:.0}s, {})",
        analysis.conversation_id,
        analysis.status,
        analysis.duration_seconds,
        analysis.call_successful
    );
    println!("  {}", analysis.summary);
    let results = &analysis.evaluation_results;
    for (name, criteria) in [
        ("interest", &results.interest_assessment),
        ("communication", &results.communication_quality),
        ("information", &results.information_gathering),
        ("next steps", &results.next_steps),
    ] {
        println!("  {name}: {} — {}", criteria.result, criteria.rationale);
    }
    let extracted = &analysis.extracted_data;
    println!("  interest level: {}", extracted.interest_level);
    println!("  rate: {}", extracted.collaboration_rate);
    println!("  content: {}", extracted.content_preferences);
    println!("  timeline: {}", extracted.timeline);
    println!("  follow-up: {}", extracted.follow_up_actions);
}
