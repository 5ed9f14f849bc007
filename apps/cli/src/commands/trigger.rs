use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;
use tokio::time::sleep;
use tracing::debug;

use reach_client::agent::AgentClient;
use reach_core::LogEntry;
use reach_stream::{AgentLogSource, LogAggregator};

use crate::config::ReachConfig;

#[derive(Args)]
pub struct TriggerArgs {
    /// Campaign to run the agent for
    pub campaign_id: String,
    /// Poll interval while streaming, in milliseconds
    #[arg(long, default_value_t = 300)]
    pub poll_ms: u64,
}

pub async fn run(args: TriggerArgs, config: &ReachConfig) -> Result<()> {
    let agent = AgentClient::new(&config.agent_url)?;
    let aggregator = LogAggregator::new(Arc::new(AgentLogSource::new(agent)));

    debug!(campaign_id = %args.campaign_id, "triggering campaign agent run");
    aggregator.start_stream(&args.campaign_id);

    let mut printed = 0;
    let final_state = loop {
        let state = aggregator.state(&args.campaign_id);
        for entry in &state.logs[printed..] {
            println!("{}", render_entry(entry));
        }
        printed = state.logs.len();

        if !state.is_streaming {
            break state;
        }
        sleep(Duration::from_millis(args.poll_ms)).await;
    };

    if let Some(error) = &final_state.stream_error {
        bail!("{error}");
    }
    if final_state.execution_completed() {
        println!("Campaign run completed.");
    } else {
        println!("Stream ended after {} entries.", final_state.logs.len());
    }
    Ok(())
}

fn render_entry(entry: &LogEntry) -> String {
    let progress = entry
        .progress
        .map(|value| format!(" ({value:.0}%)"))
        .unwrap_or_default();
    format!(
        "[{}] {}{progress} {}",
        render_timestamp(&entry.timestamp),
        entry.status,
        entry.message
    )
}

/// Agent timestamps arrive as ISO-8601 strings in arbitrary offsets; render
/// them uniformly in UTC. Unparseable values are shown as sent.
fn render_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
