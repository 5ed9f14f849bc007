pub mod campaign;
pub mod config_cmd;
pub mod creators;
pub mod outreach;
pub mod trigger;
