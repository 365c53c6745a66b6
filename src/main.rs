//! ShopNotify Server: automatic notification engine
//!
//! Main entry point that wires all crates together and runs the detection
//! job scheduler until a shutdown signal arrives.

use std::sync::Arc;

use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use shopnotify_core::config::AppConfig;
use shopnotify_core::error::AppError;
use shopnotify_database::DatabasePool;
use shopnotify_database::repositories::{
    CommerceRepository, DeviceRepository, NotificationRepository,
};
use shopnotify_realtime::RealtimeHub;
use shopnotify_service::{NotificationDispatcher, OtpService, TtlStore};
use shopnotify_worker::{CronScheduler, JobContext, JobRegistry, JobRunner};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `SHOPNOTIFY_CONFIG_DIR` and `SHOPNOTIFY_ENV`
fn load_configuration() -> Result<AppConfig, AppError> {
    let dir = std::env::var("SHOPNOTIFY_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let env = std::env::var("SHOPNOTIFY_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load_from(&dir, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ShopNotify v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    if config.database.run_migrations {
        shopnotify_database::migration::run_migrations(db.pool()).await?;
    }

    // ── Step 2: Repositories ─────────────────────────────────────
    let notifications = Arc::new(NotificationRepository::new(db.pool().clone()));
    let devices = Arc::new(DeviceRepository::new(db.pool().clone()));
    let commerce = Arc::new(CommerceRepository::new(db.pool().clone()));

    // ── Step 3: Delivery channels ────────────────────────────────
    let push = shopnotify_push::build_push_channel(&config.push)?;
    let hub = Arc::new(RealtimeHub::from_config(&config.realtime));
    tracing::info!(
        push_enabled = config.push.enabled,
        buffer = config.realtime.channel_buffer_size,
        "Delivery channels initialized"
    );

    // ── Step 4: OTP store ────────────────────────────────────────
    let otp_codes = Arc::new(TtlStore::new());
    let otp = OtpService::new(Arc::clone(&otp_codes), &config.otp);
    tracing::info!(
        ttl_seconds = otp.ttl().as_secs(),
        code_length = otp.code_length(),
        "OTP store initialized"
    );

    // ── Step 5: Dispatcher + jobs ────────────────────────────────
    let dispatcher = Arc::new(NotificationDispatcher::new(
        notifications,
        devices,
        push,
        hub,
        config.realtime.notification_event.clone(),
    ));
    let ctx = JobContext::new(commerce, dispatcher, config.worker.candidate_concurrency);
    let registry = Arc::new(JobRegistry::new(ctx));
    let runner = Arc::new(JobRunner::from_config(&config.worker));

    // ── Step 6: Scheduler ────────────────────────────────────────
    let mut scheduler = None;
    if config.worker.enabled {
        let cron = CronScheduler::new(Arc::clone(&registry), runner).await?;
        cron.register_all(&config.worker.schedules).await?;
        cron.start().await?;
        scheduler = Some(cron);
    } else {
        tracing::warn!("Detection job scheduler disabled (worker.enabled = false)");
    }

    // ── Step 7: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping scheduler...");

    if let Some(mut cron) = scheduler {
        cron.shutdown().await?;
    }
    db.close().await;
    if !otp_codes.is_empty() {
        tracing::info!(pending = otp_codes.len(), "Discarding unverified OTP codes");
    }

    tracing::info!("ShopNotify stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
