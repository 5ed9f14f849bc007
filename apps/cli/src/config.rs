use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const API_URL_ENV: &str = "REACH_API_URL";
pub const AGENT_URL_ENV: &str = "REACH_AGENT_URL";

/// Base URLs for the two backend services: the REST API (campaigns, creators,
/// outreach) and the agent service that executes runs and streams logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachConfig {
    pub api_url: String,
    pub agent_url: String,
}

/// Resolve configuration: environment overrides win over the config file.
pub fn load() -> Result<ReachConfig> {
    let file = load_file()?;
    resolve(
        file,
        std::env::var(API_URL_ENV).ok(),
        std::env::var(AGENT_URL_ENV).ok(),
    )
}

fn resolve(
    file: Option<ReachConfig>,
    env_api: Option<String>,
    env_agent: Option<String>,
) -> Result<ReachConfig> {
    let api_url = env_api.or_else(|| file.as_ref().map(|c| c.api_url.clone()));
    let agent_url = env_agent.or_else(|| file.as_ref().map(|c| c.agent_url.clone()));

    match (api_url, agent_url) {
        (Some(api_url), Some(agent_url)) => Ok(ReachConfig { api_url, agent_url }),
        _ => bail!(
            "No backend configured. Run `reach config set`, or set {API_URL_ENV} and {AGENT_URL_ENV}."
        ),
    }
}

pub fn save(config: &ReachConfig) -> Result<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create reach config dir")?;
    }

    let payload =
        serde_json::to_string_pretty(config).context("Failed to serialize reach config")?;
    fs::write(&path, payload).context("Failed to write reach config")?;

    Ok(())
}

pub fn load_file() -> Result<Option<ReachConfig>> {
    let path = config_path()?;
    let content = match fs::read_to_string(&path) {
        Ok(value) => value,
        Err(_) => return Ok(None),
    };

    let config = serde_json::from_str::<ReachConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(config))
}

pub fn config_path() -> Result<PathBuf> {
    if let Some(base) = dirs::config_dir() {
        return Ok(base.join("reach").join("config.json"));
    }
    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".reach").join("config.json"));
    }
    bail!("Unable to resolve a writable config directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_config() -> ReachConfig {
        ReachConfig {
            api_url: "http://file-api".to_string(),
            agent_url: "http://file-agent".to_string(),
        }
    }

    #[test]
    fn env_overrides_file() {
        let config = resolve(
            Some(file_config()),
            Some("http://env-api".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(config.api_url, "http://env-api");
        assert_eq!(config.agent_url, "http://file-agent");
    }

    #[test]
    fn file_alone_is_enough() {
        let config = resolve(Some(file_config()), None, None).unwrap();
        assert_eq!(config.api_url, "http://file-api");
    }

    #[test]
    fn missing_everything_is_an_error() {
        assert!(resolve(None, None, None).is_err());
        assert!(resolve(None, Some("http://env-api".to_string()), None).is_err());
    }
}
