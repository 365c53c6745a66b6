//! OAuth2 access tokens for FCM.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::{ServiceAccountAuthenticator, read_service_account_key};

use crate::error::PushError;

/// OAuth2 scope required by the FCM HTTP v1 API.
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Where the bearer token for FCM requests comes from.
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// Exchange a service account key for tokens.
    ServiceAccount(ServiceAccountTokens),
    /// A token issued out of band.
    Static(String),
}

/// Service account authenticator, built from the key file on first use.
///
/// Clones share one authenticator, so yup-oauth2 caches and refreshes the
/// token across sends. A failed build leaves the cell empty and the next
/// call tries again.
#[derive(Clone)]
pub struct ServiceAccountTokens {
    key_path: PathBuf,
    authenticator: Arc<OnceCell<DefaultAuthenticator>>,
}

impl fmt::Debug for ServiceAccountTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountTokens")
            .field("key_path", &self.key_path)
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl ServiceAccountTokens {
    pub fn new(key_path: impl Into<PathBuf>) -> Self {
        Self {
            key_path: key_path.into(),
            authenticator: Arc::new(OnceCell::new()),
        }
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    /// Whether the authenticator has been built.
    pub fn is_ready(&self) -> bool {
        self.authenticator.initialized()
    }

    async fn authenticator(&self) -> Result<&DefaultAuthenticator, PushError> {
        self.authenticator
            .get_or_try_init(|| async {
                let key = read_service_account_key(&self.key_path).await.map_err(|e| {
                    PushError::Auth(format!("reading {}: {e}", self.key_path.display()))
                })?;
                tracing::debug!(
                    path = %self.key_path.display(),
                    "Building FCM service account authenticator"
                );
                ServiceAccountAuthenticator::builder(key)
                    .build()
                    .await
                    .map_err(|e| PushError::Auth(e.to_string()))
            })
            .await
    }

    async fn token(&self) -> Result<String, PushError> {
        let token = self
            .authenticator()
            .await?
            .token(&[FCM_SCOPE])
            .await
            .map_err(|e| PushError::Auth(e.to_string()))?;
        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| PushError::Auth("no token returned".into()))
    }
}

impl TokenSource {
    /// Token source backed by a service account key file.
    pub fn service_account(key_path: impl Into<PathBuf>) -> Self {
        Self::ServiceAccount(ServiceAccountTokens::new(key_path))
    }

    /// Obtain a bearer token.
    pub async fn token(&self) -> Result<String, PushError> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::ServiceAccount(tokens) => tokens.token().await,
        }
    }
}
