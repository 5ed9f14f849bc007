use thiserror::Error;

/// Why a campaign stream stopped delivering entries. Only logged; the state
/// machine collapses both variants into the fixed user-facing message.
#[derive(Debug, Error)]
pub enum StreamFailure {
    #[error("failed to open log stream: {0}")]
    Open(String),

    #[error("transport error mid-stream: {0}")]
    Transport(String),
}
