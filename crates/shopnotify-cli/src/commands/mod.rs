//! CLI command definitions and dispatch.

pub mod jobs;
pub mod notifications;
pub mod notify;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use shopnotify_core::config::AppConfig;
use shopnotify_core::error::AppError;
use shopnotify_database::DatabasePool;
use shopnotify_database::repositories::{
    CommerceRepository, DeviceRepository, NotificationRepository,
};
use shopnotify_realtime::RealtimeHub;
use shopnotify_service::NotificationDispatcher;
use shopnotify_worker::{JobContext, JobRegistry};

use crate::output::OutputFormat;

/// ShopNotify: automatic shop notifications
#[derive(Debug, Parser)]
#[command(name = "shopnotify", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and the environment overlays
    #[arg(long, default_value = "config")]
    pub config_dir: String,

    /// Environment overlay to load
    #[arg(short, long, env = "SHOPNOTIFY_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detection jobs
    Jobs(jobs::JobsArgs),
    /// Send a notification through every channel
    Notify(notify::NotifyArgs),
    /// Read and acknowledge a user's notifications
    Notifications(notifications::NotificationsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Jobs(args) => jobs::execute(args, self).await,
            Commands::Notify(args) => notify::execute(args, self).await,
            Commands::Notifications(args) => notifications::execute(args, self).await,
        }
    }

    /// Load configuration from the selected directory and environment
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config_dir, &self.env)
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: dispatcher over Postgres and the configured push channel.
///
/// The realtime hub is process-local, so broadcasts from the CLI reach no one.
pub fn build_dispatcher(
    config: &AppConfig,
    pool: &DatabasePool,
) -> Result<Arc<NotificationDispatcher>, AppError> {
    let push = shopnotify_push::build_push_channel(&config.push)?;
    Ok(Arc::new(NotificationDispatcher::new(
        Arc::new(NotificationRepository::new(pool.pool().clone())),
        Arc::new(DeviceRepository::new(pool.pool().clone())),
        push,
        Arc::new(RealtimeHub::from_config(&config.realtime)),
        config.realtime.notification_event.clone(),
    )))
}

/// Helper: job registry over Postgres
pub fn build_registry(
    config: &AppConfig,
    pool: &DatabasePool,
) -> Result<JobRegistry, AppError> {
    let dispatcher = build_dispatcher(config, pool)?;
    let ctx = JobContext::new(
        Arc::new(CommerceRepository::new(pool.pool().clone())),
        dispatcher,
        config.worker.candidate_concurrency,
    );
    Ok(JobRegistry::new(ctx))
}
