use std::{net::SocketAddr, path::PathBuf};

use tracing_subscriber::EnvFilter;
use url::Url;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// `EnvFilter` directives, e.g. `info` or `btcquizbot=debug,teloxide=warn`.
    pub log_level: String,
    pub content_dir: PathBuf,
    pub webhook: Option<Webhook>,
}

#[derive(Debug, Clone)]
pub struct Webhook {
    pub url: Url,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup("TELOXIDE_TOKEN").ok_or(ConfigError::Missing("TELOXIDE_TOKEN"))?;

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "error".into());
        EnvFilter::try_new(&log_level).map_err(|e| ConfigError::Invalid {
            name: "LOG_LEVEL",
            reason: e.to_string(),
        })?;

        let content_dir = lookup("CONTENT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("content"));

        let webhook_url = lookup("NGROK_URL")
            .map(|raw| {
                raw.parse::<Url>().map_err(|e| ConfigError::Invalid {
                    name: "NGROK_URL",
                    reason: e.to_string(),
                })
            })
            .transpose()?;
        let webhook_addr = lookup("NGROK_ADDR")
            .map(|raw| {
                raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
                    name: "NGROK_ADDR",
                    reason: e.to_string(),
                })
            })
            .transpose()?;
        let webhook = match (webhook_url, webhook_addr) {
            (Some(url), Some(addr)) => Some(Webhook { url, addr }),
            _ => None,
        };

        Ok(Self {
            token,
            log_level,
            content_dir,
            webhook,
        })
    }
}
