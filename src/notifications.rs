use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

use crate::errors::ServiceError;

/// Composed contact-form summary handed to the delivery endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactNotification {
    pub subject: String,
    pub body: String,
}

/// Delivery seam for contact-form notifications. Callers treat delivery as
/// best-effort: a failed notify never rolls back the persisted submission.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &ContactNotification) -> Result<(), ServiceError>;
}

/// Delivers summaries to an operator-configured HTTP endpoint (typically a
/// mail relay). Actual mail transport lives behind that endpoint.
#[derive(Clone)]
pub struct ContactNotifier {
    client: reqwest::Client,
    url: String,
}

impl ContactNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Notifier for ContactNotifier {
    #[instrument(skip(self, notification))]
    async fn notify(&self, notification: &ContactNotification) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(&self.url)
            .timeout(Duration::from_secs(10))
            .json(notification)
            .send()
            .await
            .map_err(|e| {
                ServiceError::ExternalServiceError(format!("notification delivery failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "notification endpoint returned {}",
                response.status()
            )));
        }

        info!("contact notification delivered");
        Ok(())
    }
}
