pub mod errors;
pub mod stream;

pub use stream::{CampaignStreamState, LogEntry, STREAM_FAILED_MESSAGE};

pub fn pkg_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
