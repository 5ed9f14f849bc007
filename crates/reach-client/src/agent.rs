use anyhow::Result;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

use crate::errors::HttpError;

// Fixed trigger parameters. The agent tunes its own run with these; they are
// not user-configurable at this layer.
const FORCE_REFRESH: &str = "false";
const MAX_CREATORS: &str = "5";
const CALL_PRIORITY: &str = "high_match";

/// Client for the campaign agent service, which executes campaign runs and
/// reports progress over a long-lived `data:`-line event stream.
pub struct AgentClient {
    client: Client,
    base_url: Url,
}

impl AgentClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            // No overall request timeout: the stream stays open until the
            // agent finishes. Only the connect phase is bounded.
            client: Client::builder()
                .connect_timeout(Duration::from_secs(30))
                .build()?,
            base_url,
        })
    }

    /// Open the trigger stream for one campaign. The returned response body
    /// delivers UTF-8 text chunks until the server closes the connection.
    pub async fn open_log_stream(&self, campaign_id: &str) -> Result<Response, HttpError> {
        let mut url = self
            .base_url
            .join(&format!("/api/campaign-trigger/trigger/{campaign_id}/stream"))?;
        url.query_pairs_mut()
            .append_pair("force_refresh", FORCE_REFRESH)
            .append_pair("max_creators", MAX_CREATORS)
            .append_pair("call_priority", CALL_PRIORITY);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::Status { status, body });
        }

        Ok(response)
    }
}
