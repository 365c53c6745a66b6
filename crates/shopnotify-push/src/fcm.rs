//! Firebase Cloud Messaging HTTP v1 client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use shopnotify_core::config::PushConfig;
use shopnotify_core::error::{AppError, ErrorKind};
use shopnotify_core::traits::{PushChannel, PushResult};

use crate::auth::TokenSource;
use crate::error::PushError;

/// Request body for `messages:send`.
#[derive(Debug, Serialize)]
pub struct FcmMessage<'a> {
    pub message: Message<'a>,
}

/// A message addressed to one device.
#[derive(Debug, Serialize)]
pub struct Message<'a> {
    pub token: &'a str,
    pub notification: MessageNotification<'a>,
}

/// Title and body displayed on the device.
#[derive(Debug, Serialize)]
pub struct MessageNotification<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

/// Successful `messages:send` response.
#[derive(Debug, Deserialize)]
pub struct FcmResponse {
    /// `projects/{project_id}/messages/{message_id}`
    pub name: String,
}

/// Push channel backed by the FCM HTTP v1 API.
#[derive(Debug, Clone)]
pub struct FcmPushChannel {
    client: Client,
    endpoint: String,
    project_id: String,
    tokens: TokenSource,
}

impl FcmPushChannel {
    /// Create a channel against an explicit endpoint.
    pub fn new(
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
        tokens: TokenSource,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            tokens,
        })
    }

    /// Create a channel from validated push configuration.
    pub fn from_config(config: &PushConfig) -> Result<Self, AppError> {
        let project_id = config
            .project_id
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::configuration("push.project_id is missing"))?;

        let tokens = match (&config.access_token, &config.service_account_key_path) {
            (Some(token), _) if !token.is_empty() => TokenSource::Static(token.clone()),
            (_, Some(path)) if !path.is_empty() => TokenSource::service_account(path),
            _ => {
                return Err(AppError::configuration(
                    "push requires an access token or a service account key",
                ));
            }
        };

        Self::new(
            &config.endpoint,
            project_id,
            tokens,
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.endpoint, self.project_id
        )
    }

    /// Send one message, returning the FCM message name.
    pub async fn send_message(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
    ) -> Result<String, PushError> {
        let bearer = self.tokens.token().await?;
        let payload = FcmMessage {
            message: Message {
                token: device_token,
                notification: MessageNotification { title, body },
            },
        };

        let response = self
            .client
            .post(self.send_url())
            .header(header::AUTHORIZATION, format!("Bearer {bearer}"))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: FcmResponse = response.json().await?;
        Ok(parsed.name)
    }
}

#[async_trait]
impl PushChannel for FcmPushChannel {
    async fn send(&self, device_token: &str, title: &str, body: &str) -> PushResult {
        match self.send_message(device_token, title, body).await {
            Ok(name) => {
                debug!(message_id = %name, "Push delivered");
                PushResult::delivered(Some(name))
            }
            Err(e) => {
                warn!(error = %e, "Push delivery failed");
                PushResult::failed(e.to_string())
            }
        }
    }
}
