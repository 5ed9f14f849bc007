use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use reach_client::sse::StreamLineDecoder;
use reach_core::errors::StreamFailure;
use reach_core::{CampaignStreamState, LogEntry, STREAM_FAILED_MESSAGE};

use crate::source::LogStreamSource;

/// Owns every open campaign log stream in the process.
///
/// One read task per campaign id, at most one per process lifetime. All
/// failures become state on the campaign's `CampaignStreamState`; nothing is
/// returned as an error to callers. `state()` hands out snapshots, so any
/// number of consumers can poll it while streams are live.
#[derive(Clone)]
pub struct LogAggregator {
    inner: Arc<Mutex<Registry>>,
    source: Arc<dyn LogStreamSource>,
}

#[derive(Default)]
struct Registry {
    campaigns: HashMap<String, CampaignStreamState>,
    started: HashSet<String>,
    handles: HashMap<String, StreamHandle>,
}

struct StreamHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl LogAggregator {
    pub fn new(source: Arc<dyn LogStreamSource>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry::default())),
            source,
        }
    }

    /// Snapshot of one campaign's accumulated stream state. Ids that were
    /// never started yield the empty non-streaming default.
    pub fn state(&self, campaign_id: &str) -> CampaignStreamState {
        let guard = self.inner.lock().expect("registry lock poisoned");
        guard
            .campaigns
            .get(campaign_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Begin streaming logs for a campaign. A no-op if the id was already
    /// started; duplicate triggers from concurrent consumers never open a
    /// second transport. Must be called from within a tokio runtime.
    pub fn start_stream(&self, campaign_id: &str) {
        let mut guard = self.inner.lock().expect("registry lock poisoned");
        if !guard.started.insert(campaign_id.to_string()) {
            debug!(campaign_id, "log stream already started; ignoring");
            return;
        }
        guard
            .campaigns
            .insert(campaign_id.to_string(), CampaignStreamState::streaming());

        info!(campaign_id, "starting campaign log stream");
        // Registered under the same guard that claims the started-set, so a
        // concurrent shutdown() always sees this stream's handle.
        let token = CancellationToken::new();
        let task = tokio::spawn(run_stream(
            self.inner.clone(),
            self.source.clone(),
            campaign_id.to_string(),
            token.clone(),
        ));
        guard
            .handles
            .insert(campaign_id.to_string(), StreamHandle { token, task });
    }

    /// Cancel every open stream and wait for the read tasks to settle.
    /// Cancellation is a normal lifecycle event: accumulated logs are kept
    /// and no `stream_error` is recorded.
    pub async fn shutdown(&self) {
        let handles: Vec<(String, StreamHandle)> = {
            let mut guard = self.inner.lock().expect("registry lock poisoned");
            guard.handles.drain().collect()
        };

        for (campaign_id, handle) in handles {
            handle.token.cancel();
            if handle.task.await.is_err() {
                warn!(%campaign_id, "log stream task panicked during shutdown");
            }
        }
    }
}

async fn run_stream(
    inner: Arc<Mutex<Registry>>,
    source: Arc<dyn LogStreamSource>,
    campaign_id: String,
    token: CancellationToken,
) {
    let mut chunks = match source.open(&campaign_id).await {
        Ok(stream) => stream,
        Err(err) => {
            warn!(%campaign_id, "{}", StreamFailure::Open(err.to_string()));
            mark_failed(&inner, &campaign_id);
            return;
        }
    };

    let mut decoder = StreamLineDecoder::new();
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                info!(%campaign_id, "log stream cancelled");
                mark_stopped(&inner, &campaign_id);
                return;
            }
            next = chunks.next() => match next {
                Some(Ok(chunk)) => {
                    for entry in decoder.push_chunk(&chunk) {
                        append_entry(&inner, &campaign_id, entry);
                    }
                }
                Some(Err(err)) => {
                    warn!(%campaign_id, "{}", StreamFailure::Transport(err.to_string()));
                    mark_failed(&inner, &campaign_id);
                    return;
                }
                None => {
                    let received = {
                        let guard = inner.lock().expect("registry lock poisoned");
                        guard
                            .campaigns
                            .get(&campaign_id)
                            .map(|state| state.logs.len())
                            .unwrap_or(0)
                    };
                    info!(%campaign_id, received, "log stream ended");
                    mark_stopped(&inner, &campaign_id);
                    return;
                }
            }
        }
    }
}

fn append_entry(inner: &Arc<Mutex<Registry>>, campaign_id: &str, entry: LogEntry) {
    let mut guard = inner.lock().expect("registry lock poisoned");
    let state = guard
        .campaigns
        .entry(campaign_id.to_string())
        .or_default();
    state.logs.push(entry);
    state.is_streaming = true;
    state.stream_error = None;
}

/// Stream ended without a transport failure (normal end or cancellation).
/// Leaves logs and any previously recorded error untouched.
fn mark_stopped(inner: &Arc<Mutex<Registry>>, campaign_id: &str) {
    let mut guard = inner.lock().expect("registry lock poisoned");
    let state = guard
        .campaigns
        .entry(campaign_id.to_string())
        .or_default();
    state.is_streaming = false;
}

fn mark_failed(inner: &Arc<Mutex<Registry>>, campaign_id: &str) {
    let mut guard = inner.lock().expect("registry lock poisoned");
    let state = guard
        .campaigns
        .entry(campaign_id.to_string())
        .or_default();
    state.is_streaming = false;
    state.stream_error = Some(STREAM_FAILED_MESSAGE.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::LogChunkStream;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use futures_util::stream;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn line(message: &str, status: &str) -> String {
        format!(
            "data: {{\"message\":\"{message}\",\"status\":\"{status}\",\"timestamp\":\"2024-01-01T00:00:00Z\"}}\n"
        )
    }

    /// Source that replays a scripted chunk sequence per campaign id.
    /// With `hold_open` the stream stays pending after the script instead of
    /// ending, so cancellation paths can be exercised.
    struct ScriptedSource {
        scripts: Mutex<HashMap<String, Vec<Result<Vec<u8>>>>>,
        opens: AtomicUsize,
        hold_open: bool,
    }

    impl ScriptedSource {
        fn new(hold_open: bool) -> Self {
            Self {
                scripts: Mutex::new(HashMap::new()),
                opens: AtomicUsize::new(0),
                hold_open,
            }
        }

        fn script(self, campaign_id: &str, chunks: Vec<Result<Vec<u8>>>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(campaign_id.to_string(), chunks);
            self
        }

        fn opens(&self) -> usize {
            self.opens.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LogStreamSource for ScriptedSource {
        async fn open(&self, campaign_id: &str) -> Result<LogChunkStream> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            let chunks = self
                .scripts
                .lock()
                .unwrap()
                .remove(campaign_id)
                .ok_or_else(|| anyhow!("no stream for campaign {campaign_id}"))?;
            let replay = stream::iter(chunks);
            if self.hold_open {
                Ok(replay.chain(stream::pending()).boxed())
            } else {
                Ok(replay.boxed())
            }
        }
    }

    async fn wait_for(
        aggregator: &LogAggregator,
        campaign_id: &str,
        what: &str,
        predicate: impl Fn(&CampaignStreamState) -> bool,
    ) -> CampaignStreamState {
        for _ in 0..400 {
            let state = aggregator.state(campaign_id);
            if predicate(&state) {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "timed out waiting for {what} on {campaign_id}: {:?}",
            aggregator.state(campaign_id)
        );
    }

    fn messages(state: &CampaignStreamState) -> Vec<&str> {
        state
            .logs
            .iter()
            .map(|entry| entry.message.as_str())
            .collect()
    }

    #[tokio::test]
    async fn chunk_boundaries_do_not_affect_parsed_order() {
        // Full payload split mid-line and mid-JSON-token.
        let full = format!(
            "{}{}{}",
            line("first", "running"),
            line("second", "running"),
            "data: {\"message\":\"third\",\"status\":\"completed\",\"timestamp\":\"t\",\"progress\":100}\n"
        );
        let (a, rest) = full.split_at(17);
        let (b, c) = rest.split_at(40);
        let source = ScriptedSource::new(false).script(
            "c-1",
            vec![
                Ok(a.as_bytes().to_vec()),
                Ok(b.as_bytes().to_vec()),
                Ok(c.as_bytes().to_vec()),
            ],
        );

        let aggregator = LogAggregator::new(Arc::new(source));
        aggregator.start_stream("c-1");

        let state = wait_for(&aggregator, "c-1", "stream end", |s| !s.is_streaming).await;
        assert_eq!(messages(&state), ["first", "second", "third"]);
        assert!(state.stream_error.is_none());
        assert!(state.execution_completed());
    }

    #[tokio::test]
    async fn duplicate_start_opens_a_single_transport() {
        let source = Arc::new(
            ScriptedSource::new(false)
                .script("c-2", vec![Ok(line("only", "running").into_bytes())]),
        );
        let aggregator = LogAggregator::new(source.clone());

        aggregator.start_stream("c-2");
        aggregator.start_stream("c-2");

        let state = wait_for(&aggregator, "c-2", "stream end", |s| !s.is_streaming).await;
        assert_eq!(messages(&state), ["only"]);
        assert_eq!(source.opens(), 1);

        // Started-set is per process lifetime: a later start is still a no-op
        // and does not clear the accumulated logs.
        aggregator.start_stream("c-2");
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(source.opens(), 1);
        assert_eq!(messages(&aggregator.state("c-2")), ["only"]);
    }

    #[tokio::test]
    async fn malformed_lines_are_dropped_without_stopping_the_stream() {
        let source = ScriptedSource::new(false).script(
            "c-3",
            vec![
                Ok(b"not-data-prefixed\n".to_vec()),
                Ok(b"data: {bad json\n".to_vec()),
                Ok(line("after", "running").into_bytes()),
            ],
        );
        let aggregator = LogAggregator::new(Arc::new(source));
        aggregator.start_stream("c-3");

        let state = wait_for(&aggregator, "c-3", "stream end", |s| !s.is_streaming).await;
        assert_eq!(messages(&state), ["after"]);
        assert!(state.stream_error.is_none());
    }

    #[tokio::test]
    async fn transport_error_records_error_and_keeps_entries() {
        let source = ScriptedSource::new(false).script(
            "c-4",
            vec![
                Ok(line("one", "running").into_bytes()),
                Ok(line("two", "running").into_bytes()),
                Err(anyhow!("connection reset")),
            ],
        );
        let aggregator = LogAggregator::new(Arc::new(source));
        aggregator.start_stream("c-4");

        let state = wait_for(&aggregator, "c-4", "stream failure", |s| !s.is_streaming).await;
        assert_eq!(messages(&state), ["one", "two"]);
        assert_eq!(state.stream_error.as_deref(), Some(STREAM_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn shutdown_cancels_without_recording_an_error() {
        let source = ScriptedSource::new(true).script(
            "c-5",
            vec![
                Ok(line("one", "running").into_bytes()),
                Ok(line("two", "running").into_bytes()),
            ],
        );
        let aggregator = LogAggregator::new(Arc::new(source));
        aggregator.start_stream("c-5");

        wait_for(&aggregator, "c-5", "two entries", |s| s.logs.len() == 2).await;
        aggregator.shutdown().await;

        let state = aggregator.state("c-5");
        assert_eq!(messages(&state), ["one", "two"]);
        assert!(!state.is_streaming);
        assert!(state.stream_error.is_none());
    }

    #[tokio::test]
    async fn shutdown_right_after_start_cancels_the_stream() {
        // The handle is registered before start_stream returns, so shutdown
        // cancels the stream even when the read task has not yet polled.
        let source = ScriptedSource::new(true).script("c-7", vec![]);
        let aggregator = LogAggregator::new(Arc::new(source));

        aggregator.start_stream("c-7");
        aggregator.shutdown().await;

        let state = aggregator.state("c-7");
        assert!(!state.is_streaming);
        assert!(state.stream_error.is_none());
        assert!(state.logs.is_empty());
    }

    #[tokio::test]
    async fn open_failure_surfaces_as_stream_error() {
        // No script for the id, so open() fails.
        let aggregator = LogAggregator::new(Arc::new(ScriptedSource::new(false)));
        aggregator.start_stream("c-6");

        let state = wait_for(&aggregator, "c-6", "open failure", |s| !s.is_streaming).await;
        assert!(state.logs.is_empty());
        assert_eq!(state.stream_error.as_deref(), Some(STREAM_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn campaigns_do_not_cross_contaminate() {
        let source = ScriptedSource::new(false)
            .script("a", vec![Ok(line("a-1", "running").into_bytes())])
            .script("b", vec![
                Ok(line("b-1", "running").into_bytes()),
                Ok(line("b-2", "completed").into_bytes()),
            ]);
        let aggregator = LogAggregator::new(Arc::new(source));
        aggregator.start_stream("a");
        aggregator.start_stream("b");

        let state_a = wait_for(&aggregator, "a", "stream end", |s| !s.is_streaming).await;
        let state_b = wait_for(&aggregator, "b", "stream end", |s| !s.is_streaming).await;
        assert_eq!(messages(&state_a), ["a-1"]);
        assert_eq!(messages(&state_b), ["b-1", "b-2"]);
        assert!(!state_a.execution_completed());
        assert!(state_b.execution_completed());
    }

    #[tokio::test]
    async fn unknown_campaign_yields_default_state() {
        let aggregator = LogAggregator::new(Arc::new(ScriptedSource::new(false)));
        let state = aggregator.state("never-started");
        assert!(state.logs.is_empty());
        assert!(!state.is_streaming);
        assert!(state.stream_error.is_none());
    }
}
