//! Notification sending commands.

use clap::{Args, Subcommand};

use shopnotify_core::error::AppError;
use shopnotify_core::types::id::UserId;

use super::Cli;
use crate::output;

/// Arguments for notify commands
#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Notify subcommand
    #[command(subcommand)]
    pub command: NotifyCommand,
}

/// Notify subcommands
#[derive(Debug, Subcommand)]
pub enum NotifyCommand {
    /// Send the fixed test notification through store, push and realtime
    Test {
        /// Recipient user id
        #[arg(short, long)]
        user: UserId,
    },
}

/// Execute notify commands
pub async fn execute(args: &NotifyArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;
    let pool = super::create_db_pool(&config).await?;
    let dispatcher = super::build_dispatcher(&config, &pool)?;

    let result = match &args.command {
        NotifyCommand::Test { user } => dispatcher.send_test(*user).await,
    };
    pool.close().await;
    let notification = result?;

    output::print_success(&format!(
        "Test notification {} sent to user {}",
        notification.id, notification.user_id
    ));
    Ok(())
}
