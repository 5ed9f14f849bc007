use anyhow::Result;
use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;

use reach_client::agent::AgentClient;

/// Raw byte chunks from one campaign's trigger stream, in arrival order.
/// Chunk boundaries carry no meaning; line framing happens downstream.
pub type LogChunkStream = BoxStream<'static, Result<Vec<u8>>>;

/// Transport seam for the aggregator. Production wraps the agent service's
/// HTTP response body; tests script chunk sequences directly.
#[async_trait]
pub trait LogStreamSource: Send + Sync {
    async fn open(&self, campaign_id: &str) -> Result<LogChunkStream>;
}

pub struct AgentLogSource {
    client: AgentClient,
}

impl AgentLogSource {
    pub fn new(client: AgentClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LogStreamSource for AgentLogSource {
    async fn open(&self, campaign_id: &str) -> Result<LogChunkStream> {
        let response = self.client.open_log_stream(campaign_id).await?;
        let chunks = response.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(anyhow::Error::from)
        });
        Ok(chunks.boxed())
    }
}
