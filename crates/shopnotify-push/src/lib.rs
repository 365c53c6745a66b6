//! # shopnotify-push
//!
//! Push delivery for ShopNotify. [`FcmPushChannel`] talks to the Firebase
//! Cloud Messaging HTTP v1 API; [`LoggingPushChannel`] stands in when push
//! is disabled so dispatch code never has to special-case it.

pub mod auth;
pub mod error;
pub mod fcm;
pub mod logging;

use std::sync::Arc;

use shopnotify_core::config::PushConfig;
use shopnotify_core::error::AppError;
use shopnotify_core::traits::PushChannel;

pub use auth::{ServiceAccountTokens, TokenSource};
pub use error::PushError;
pub use fcm::FcmPushChannel;
pub use logging::LoggingPushChannel;

/// Build the push channel selected by configuration.
pub fn build_push_channel(config: &PushConfig) -> Result<Arc<dyn PushChannel>, AppError> {
    config.validate()?;
    if !config.enabled {
        tracing::info!("Push delivery disabled, pushes will only be logged");
        return Ok(Arc::new(LoggingPushChannel::new()));
    }
    Ok(Arc::new(FcmPushChannel::from_config(config)?))
}
