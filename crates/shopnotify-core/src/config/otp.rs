//! One-time password configuration.

use serde::{Deserialize, Serialize};

/// Phone verification code settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Seconds a code stays valid.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Number of digits in a generated code.
    #[serde(default = "default_code_length")]
    pub code_length: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            code_length: default_code_length(),
        }
    }
}

fn default_ttl() -> u64 {
    600
}

fn default_code_length() -> u32 {
    6
}
