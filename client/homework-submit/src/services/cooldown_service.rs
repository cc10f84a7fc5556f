use std::sync::Arc;

use anyhow::{Context, Result};

use super::cooldown_store::CooldownStore;
use crate::models::{AssignmentContext, CooldownKey, GateDecision, StudentIdentity};

/// Client-side lockout between submission attempts of the same student on
/// the same assignment.
pub struct SubmissionGate {
    store: Arc<dyn CooldownStore>,
    window_ms: i64,
}

impl SubmissionGate {
    pub fn new(store: Arc<dyn CooldownStore>, window_ms: u64) -> Self {
        Self {
            store,
            window_ms: i64::try_from(window_ms).unwrap_or(i64::MAX),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    /// Never fails: an unreadable record counts as "no previous attempt".
    pub async fn check_and_proceed(
        &self,
        context: &AssignmentContext,
        student: &StudentIdentity,
        now_ms: i64,
    ) -> GateDecision {
        let key = CooldownKey::derive(context, student);
        let last = self.last_attempt(&key).await.unwrap_or(0);
        let elapsed = now_ms.saturating_sub(last);

        if elapsed < self.window_ms {
            let remaining_ms = self.window_ms.saturating_sub(elapsed);
            tracing::warn!(
                "Submission blocked by cooldown: key={}, remaining_ms={}",
                key,
                remaining_ms
            );
            GateDecision::Blocked { remaining_ms }
        } else {
            GateDecision::Allowed
        }
    }

    pub async fn record_attempt(
        &self,
        context: &AssignmentContext,
        student: &StudentIdentity,
        now_ms: i64,
    ) -> Result<()> {
        let key = CooldownKey::derive(context, student);
        self.store
            .set(key.as_str(), &now_ms.to_string())
            .await
            .with_context(|| format!("Failed to record attempt for {}", key))?;

        tracing::debug!("Recorded attempt: key={}, at={}", key, now_ms);
        Ok(())
    }

    /// Stored timestamp of the last attempt, if any usable one exists.
    pub async fn last_attempt(&self, key: &CooldownKey) -> Option<i64> {
        match self.store.get(key.as_str()).await {
            Ok(Some(raw)) => match raw.trim().parse::<i64>() {
                Ok(ts) => Some(ts),
                Err(_) => {
                    tracing::warn!(
                        "Ignoring unparsable cooldown timestamp: key={}, value={:?}",
                        key,
                        raw
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Cooldown store read failed for key={}: {:#}", key, e);
                None
            }
        }
    }
}
