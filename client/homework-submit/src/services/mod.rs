use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;

pub mod cooldown_service;
pub mod cooldown_store;
pub mod reply_service;
pub mod scorer_client;
pub mod submission_service;

pub use cooldown_service::SubmissionGate;
pub use cooldown_store::{CooldownStore, FileCooldownStore, MemoryCooldownStore, RedisCooldownStore};
pub use reply_service::parse_reply;
pub use scorer_client::{HttpScorerClient, ScorerClient};
pub use submission_service::{SubmissionResult, SubmissionService};

/// Redis when configured, otherwise the local JSON file.
pub async fn open_cooldown_store(config: &Config) -> Result<Arc<dyn CooldownStore>> {
    match config.redis_uri.as_deref() {
        Some(uri) => Ok(Arc::new(RedisCooldownStore::connect(uri).await?)),
        None => {
            tracing::debug!(
                "Using file cooldown store at {}",
                config.cooldown_store_path
            );
            Ok(Arc::new(FileCooldownStore::new(&config.cooldown_store_path)))
        }
    }
}

pub async fn build_gate(config: &Config) -> Result<SubmissionGate> {
    let store = open_cooldown_store(config).await?;
    Ok(SubmissionGate::new(store, config.cooldown_window_ms))
}

pub async fn build_submission_service(config: &Config) -> Result<SubmissionService> {
    let endpoint = config.scorer_endpoint()?;
    let gate = build_gate(config).await?;
    let scorer = Arc::new(HttpScorerClient::new(endpoint));
    Ok(SubmissionService::new(gate, scorer))
}
