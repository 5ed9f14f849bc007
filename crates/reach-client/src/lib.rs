pub mod agent;
pub mod api;
pub mod errors;
pub mod sse;
