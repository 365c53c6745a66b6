//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod database;
pub mod logging;
pub mod otp;
pub mod push;
pub mod realtime;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::otp::OtpConfig;
pub use self::push::PushConfig;
pub use self::realtime::RealtimeConfig;
pub use self::worker::{JobSchedules, WorkerConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Detection job worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Push delivery settings.
    #[serde(default)]
    pub push: PushConfig,
    /// Real-time channel settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// One-time password settings.
    #[serde(default)]
    pub otp: OtpConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default` with an environment-specific overlay
    /// and environment variables prefixed with `SHOPNOTIFY__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Load configuration from an explicit directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SHOPNOTIFY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let app: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        app.validate()?;
        Ok(app)
    }

    /// Validate cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.push.validate()?;
        self.worker.validate()?;
        Ok(())
    }
}
