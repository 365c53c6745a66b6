//! Phone verification codes.

use std::sync::Arc;
use std::time::Duration;

use rand::RngExt;
use tracing::{debug, info};

use shopnotify_core::config::OtpConfig;
use shopnotify_core::error::AppError;

use super::store::TtlStore;

/// Issues and verifies single-use numeric codes keyed by phone number.
#[derive(Debug, Clone)]
pub struct OtpService {
    codes: Arc<TtlStore<String, String>>,
    ttl: Duration,
    code_length: u32,
}

impl OtpService {
    /// Creates a service over a shared code store.
    pub fn new(codes: Arc<TtlStore<String, String>>, config: &OtpConfig) -> Self {
        Self {
            codes,
            ttl: Duration::from_secs(config.ttl_seconds),
            code_length: config.code_length.clamp(4, 10),
        }
    }

    /// How long an issued code stays valid.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn code_length(&self) -> u32 {
        self.code_length
    }

    /// Generate and store a fresh code for `phone`, replacing any previous one.
    pub fn issue(&self, phone: &str) -> Result<String, AppError> {
        let phone = normalize(phone)?;
        let mut rng = rand::rng();
        let code: String = (0..self.code_length)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect();
        self.codes.put(phone.clone(), code.clone(), self.ttl);
        info!(phone = %mask(&phone), "Verification code issued");
        Ok(code)
    }

    /// Check a code. A match consumes it; a mismatch leaves it in place.
    pub fn verify(&self, phone: &str, code: &str) -> Result<bool, AppError> {
        let phone = normalize(phone)?;
        let code = code.trim();
        let matched = self
            .codes
            .remove_if(&phone, |stored| stored == code)
            .is_some();
        debug!(phone = %mask(&phone), matched, "Verification attempt");
        Ok(matched)
    }
}

fn normalize(phone: &str) -> Result<String, AppError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(AppError::validation("phone number is required"));
    }
    Ok(phone.to_string())
}

fn mask(phone: &str) -> String {
    let visible = phone.chars().count().saturating_sub(4);
    phone
        .chars()
        .enumerate()
        .map(|(i, c)| if i < visible { '*' } else { c })
        .collect()
}
