use async_trait::async_trait;
use tracing::debug;

use crate::config::RelayConfig;
use crate::error::DeliveryError;
use crate::message::OutboundEmail;

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError>;
}

/// Posts each message as JSON to an HTTP mail submission API, authenticating
/// with the operator address and app secret.
pub struct HttpMailer {
    http: reqwest::Client,
    config: RelayConfig,
}

impl HttpMailer {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
        debug!(to = %email.to, subject = %email.subject, "mail API request");

        let response = self
            .http
            .post(&self.config.api_url)
            .basic_auth(&self.config.operator_address, Some(&self.config.app_secret))
            .json(email)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(DeliveryError::Rejected(format!("HTTP {status}: {text}")));
        }
        Ok(())
    }
}
