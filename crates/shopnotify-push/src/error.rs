//! Push client errors.

use thiserror::Error;

/// Errors raised while talking to the FCM API.
///
/// These never leave the crate: [`crate::FcmPushChannel`] folds them into a
/// failed `PushResult`.
#[derive(Error, Debug)]
pub enum PushError {
    /// Obtaining an OAuth2 access token failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The HTTP request could not be sent or its body not read.
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// FCM answered with a non-success status.
    #[error("FCM API error ({status}): {body}")]
    Api { status: u16, body: String },
}
