use serde::{Deserialize, Serialize};

pub type CampaignId = String;

/// Message stored in `CampaignStreamState.stream_error` for any transport
/// failure. The detailed cause is logged, not surfaced; consumers render this
/// string inline next to whatever logs already arrived.
pub const STREAM_FAILED_MESSAGE: &str = "Failed to stream logs.";

/// One decoded event from a campaign's agent-activity stream.
///
/// `timestamp` is kept as the raw string the agent sent (ISO-8601); display
/// layers re-render it in their own timezone. `data` is event-specific and
/// opaque at this level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub status: String,
    pub timestamp: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl LogEntry {
    /// Whether this single entry signals the end of the agent run. The agent
    /// emits either a `"completed"` status or a final 100% progress tick on
    /// its last event; the two are treated as equivalent.
    pub fn is_terminal(&self) -> bool {
        self.status == "completed" || self.progress == Some(100.0)
    }
}

/// Externally visible state for one campaign's log stream.
///
/// Entries are appended strictly in arrival order and never reordered or
/// deduplicated. Accumulated logs survive stream errors and cancellation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignStreamState {
    pub logs: Vec<LogEntry>,
    pub is_streaming: bool,
    #[serde(default)]
    pub stream_error: Option<String>,
}

impl CampaignStreamState {
    pub fn streaming() -> Self {
        Self {
            logs: Vec::new(),
            is_streaming: true,
            stream_error: None,
        }
    }

    /// Derived terminal check: true once any received entry reports the run
    /// finished. Not separate state; recomputed over `logs` on demand.
    pub fn execution_completed(&self) -> bool {
        self.logs.iter().any(LogEntry::is_terminal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: &str, progress: Option<f64>) -> LogEntry {
        LogEntry {
            message: String::new(),
            status: status.to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            progress,
            data: None,
        }
    }

    #[test]
    fn default_state_is_empty_and_idle() {
        let state = CampaignStreamState::default();
        assert!(state.logs.is_empty());
        assert!(!state.is_streaming);
        assert!(state.stream_error.is_none());
        assert!(!state.execution_completed());
    }

    #[test]
    fn completed_status_marks_execution_complete() {
        let state = CampaignStreamState {
            logs: vec![
                entry("running", None),
                entry("running", Some(50.0)),
                entry("completed", None),
            ],
            is_streaming: false,
            stream_error: None,
        };
        assert!(state.execution_completed());
    }

    #[test]
    fn full_progress_marks_execution_complete() {
        let state = CampaignStreamState {
            logs: vec![entry("running", Some(100.0))],
            is_streaming: true,
            stream_error: None,
        };
        assert!(state.execution_completed());
    }

    #[test]
    fn partial_progress_is_not_complete() {
        let state = CampaignStreamState {
            logs: vec![entry("running", None), entry("running", Some(99.0))],
            is_streaming: true,
            stream_error: None,
        };
        assert!(!state.execution_completed());
    }

    #[test]
    fn log_entry_tolerates_missing_optional_fields() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"message":"start","status":"running","timestamp":"2024-01-01T00:00:00Z"}"#,
        )
        .expect("minimal entry should parse");
        assert_eq!(entry.message, "start");
        assert!(entry.progress.is_none());
        assert!(entry.data.is_none());
    }
}
