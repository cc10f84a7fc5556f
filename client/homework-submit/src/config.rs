use serde::Deserialize;
use std::env;
use url::Url;

use crate::models::DEFAULT_COOLDOWN_WINDOW_MS;

pub const DEFAULT_COOLDOWN_STORE_PATH: &str = ".homework-cooldown.json";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scorer_url: Option<String>,
    pub cooldown_window_ms: u64,
    pub cooldown_store_path: String,
    pub redis_uri: Option<String>,
}

impl Config {
    /// Defaults for everything except the scorer endpoint.
    pub fn new(scorer_url: impl Into<String>) -> Self {
        Self {
            scorer_url: Some(scorer_url.into()),
            cooldown_window_ms: DEFAULT_COOLDOWN_WINDOW_MS,
            cooldown_store_path: DEFAULT_COOLDOWN_STORE_PATH.to_string(),
            redis_uri: None,
        }
    }

    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let scorer_url = settings
            .get_string("scorer.url")
            .or_else(|_| env::var("SCORER_URL"))
            .ok()
            .filter(|url| !url.trim().is_empty());

        let cooldown_window_ms = match settings
            .get_string("cooldown.window_ms")
            .or_else(|_| env::var("COOLDOWN_WINDOW_MS"))
        {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                config::ConfigError::Message(format!(
                    "cooldown window must be a whole number of milliseconds, got {:?}: {}",
                    raw, e
                ))
            })?,
            Err(_) => DEFAULT_COOLDOWN_WINDOW_MS,
        };

        let cooldown_store_path = settings
            .get_string("cooldown.store_path")
            .or_else(|_| env::var("COOLDOWN_STORE_PATH"))
            .unwrap_or_else(|_| DEFAULT_COOLDOWN_STORE_PATH.to_string());

        let redis_uri = settings
            .get_string("redis.uri")
            .or_else(|_| env::var("REDIS_URI"))
            .ok()
            .filter(|uri| !uri.trim().is_empty());

        tracing::debug!(
            "Configuration loaded: env={}, cooldown_window_ms={}, redis={}",
            env,
            cooldown_window_ms,
            redis_uri.is_some()
        );

        Ok(Config {
            scorer_url,
            cooldown_window_ms,
            cooldown_store_path,
            redis_uri,
        })
    }

    /// Scorer endpoint; only commands that actually submit need it.
    pub fn scorer_endpoint(&self) -> Result<Url, config::ConfigError> {
        let raw = self
            .scorer_url
            .as_deref()
            .ok_or_else(|| config::ConfigError::NotFound("scorer.url".to_string()))?;

        let url = Url::parse(raw.trim()).map_err(|e| {
            config::ConfigError::Message(format!("invalid scorer url {:?}: {}", raw, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(config::ConfigError::Message(format!(
                "scorer url must use http or https, got {}",
                other
            ))),
        }
    }
}
