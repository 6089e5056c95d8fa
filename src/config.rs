//! Credential resolution: CLI flag first, then the config file at
//! `~/.config/watools/config.toml`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    wild_apricot_api_key: Option<String>,
    slack_token: Option<String>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("watools").join("config.toml"))
}

fn load_file_config() -> Result<FileConfig> {
    let Some(path) = config_path() else {
        return Ok(FileConfig::default());
    };
    if !path.exists() {
        return Ok(FileConfig::default());
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn resolve_wild_apricot_key(flag: Option<String>) -> Result<String> {
    if let Some(key) = flag {
        return Ok(key);
    }
    load_file_config()?.wild_apricot_api_key.context(
        "No Wild Apricot API key.\n\
         Pass --wild-apricot-api-key or set wild_apricot_api_key in config.toml",
    )
}

pub fn resolve_slack_token(flag: Option<String>) -> Result<String> {
    if let Some(token) = flag {
        return Ok(token);
    }
    load_file_config()?.slack_token.context(
        "No Slack token.\n\
         Pass --slack-token or set slack_token in config.toml",
    )
}
