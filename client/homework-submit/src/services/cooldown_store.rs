use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;

const REDIS_KEY_PREFIX: &str = "homework:cooldown:";

/// Durable key/value storage for last-attempt timestamps.
///
/// Values are millisecond epoch timestamps written as decimal strings.
#[async_trait]
pub trait CooldownStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryCooldownStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCooldownStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CooldownStore for MemoryCooldownStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Cooldown store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Cooldown store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object file, one entry per cooldown key. Survives restarts.
pub struct FileCooldownStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileCooldownStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_raw(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read cooldown store {}", self.path.display())),
        }
    }

    fn parse_entries(&self, raw: &str) -> Result<BTreeMap<String, String>> {
        serde_json::from_str(raw)
            .with_context(|| format!("Failed to parse cooldown store {}", self.path.display()))
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        match self.read_raw().await? {
            Some(raw) => self.parse_entries(&raw),
            None => Ok(BTreeMap::new()),
        }
    }
}

#[async_trait]
impl CooldownStore for FileCooldownStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        // Unparsable contents are discarded and overwritten.
        let mut entries = match self.read_raw().await? {
            Some(raw) => self.parse_entries(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable cooldown store: {:#}", e);
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        entries.insert(key.to_string(), value.to_string());
        let json =
            serde_json::to_string_pretty(&entries).context("Failed to serialize cooldown store")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        // Write-then-rename so a crash never leaves a truncated file behind.
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        tracing::debug!("Cooldown store updated: path={}", self.path.display());
        Ok(())
    }
}

pub struct RedisCooldownStore {
    redis: ConnectionManager,
}

impl RedisCooldownStore {
    pub async fn connect(redis_uri: &str) -> Result<Self> {
        let client = redis::Client::open(redis_uri).context("Failed to create Redis client")?;

        tracing::info!("Attempting to connect to Redis...");

        let redis = tokio::time::timeout(Duration::from_secs(30), ConnectionManager::new(client))
            .await
            .map_err(|_| anyhow!("Redis connection timeout after 30s"))??;

        let mut conn = redis.clone();
        tokio::time::timeout(
            Duration::from_secs(5),
            redis::cmd("PING").query_async::<String>(&mut conn),
        )
        .await
        .map_err(|_| anyhow!("Redis PING timeout after 5s"))??;

        tracing::info!("Redis connection established successfully");

        Ok(Self { redis })
    }

    pub fn namespaced_key(key: &str) -> String {
        format!("{}{}", REDIS_KEY_PREFIX, key)
    }
}

#[async_trait]
impl CooldownStore for RedisCooldownStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.redis.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(Self::namespaced_key(key))
            .query_async(&mut conn)
            .await
            .context("Failed to read cooldown timestamp from Redis")?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.redis.clone();
        redis::cmd("SET")
            .arg(Self::namespaced_key(key))
            .arg(value)
            .query_async::<()>(&mut conn)
            .await
            .context("Failed to store cooldown timestamp in Redis")?;
        Ok(())
    }
}
