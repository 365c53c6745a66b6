//! Push delivery configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Firebase Cloud Messaging push configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Whether remote push delivery is enabled. When disabled, pushes are
    /// only logged.
    #[serde(default)]
    pub enabled: bool,
    /// Firebase project identifier.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Path to the service account key JSON file.
    #[serde(default)]
    pub service_account_key_path: Option<String>,
    /// Pre-issued OAuth2 bearer token, used instead of a service account.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Base URL of the FCM HTTP v1 API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            project_id: None,
            service_account_key_path: None,
            access_token: None,
            endpoint: default_endpoint(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

impl PushConfig {
    /// Reject an enabled push channel that has nowhere to send or no credentials.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.enabled {
            return Ok(());
        }

        if self.project_id.as_deref().is_none_or(str::is_empty) {
            return Err(AppError::configuration(
                "push.enabled is set but push.project_id is missing",
            ));
        }

        let has_key = self
            .service_account_key_path
            .as_deref()
            .is_some_and(|p| !p.is_empty());
        let has_token = self.access_token.as_deref().is_some_and(|t| !t.is_empty());
        if !has_key && !has_token {
            return Err(AppError::configuration(
                "push.enabled is set but neither push.service_account_key_path nor push.access_token is configured",
            ));
        }

        Ok(())
    }
}

fn default_endpoint() -> String {
    "https://fcm.googleapis.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_disabled_push_needs_nothing() {
        assert!(PushConfig::default().validate().is_ok());
    }

    #[test]
    fn test_enabled_push_requires_project() {
        let config = PushConfig {
            enabled: true,
            access_token: Some("token".into()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_enabled_push_requires_credentials() {
        let config = PushConfig {
            enabled: true,
            project_id: Some("shop-prod".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PushConfig {
            service_account_key_path: Some("/etc/shopnotify/sa.json".into()),
            ..config
        };
        assert!(config.validate().is_ok());
    }
}
