use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::TransportError;
use crate::models::SubmissionPayload;

/// Remote scorer. Returns the plain-text reply body.
#[async_trait]
pub trait ScorerClient: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<String, TransportError>;
}

pub struct HttpScorerClient {
    http_client: Client,
    endpoint: Url,
}

impl HttpScorerClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http_client: Client::new(),
            endpoint,
        }
    }

    pub fn with_client(http_client: Client, endpoint: Url) -> Self {
        Self {
            http_client,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ScorerClient for HttpScorerClient {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<String, TransportError> {
        tracing::info!(
            "Sending submission: homework={}, student={} {}",
            payload.assignment_id,
            payload.first_name,
            payload.last_name
        );

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .form(&payload.form_fields())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // The scorer reports its own errors in-band, so any body is worth interpreting.
        if !status.is_success() && body.trim().is_empty() {
            tracing::warn!("Scorer returned status {} with an empty body", status);
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        tracing::debug!("Scorer replied: status={}, bytes={}", status, body.len());
        Ok(body)
    }
}
