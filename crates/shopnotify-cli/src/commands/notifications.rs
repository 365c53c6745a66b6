//! Notification read-side CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use shopnotify_core::error::AppError;
use shopnotify_core::types::id::{NotificationId, UserId};
use shopnotify_core::types::pagination::PageRequest;
use shopnotify_database::repositories::NotificationRepository;
use shopnotify_entity::notification::Notification;
use shopnotify_service::NotificationService;

use super::Cli;
use crate::output;

/// Arguments for notification commands
#[derive(Debug, Args)]
pub struct NotificationsArgs {
    /// Notifications subcommand
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

/// Notifications subcommands
#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List a user's notifications, newest first
    List {
        #[arg(short, long)]
        user: UserId,
        #[arg(long, default_value = "1")]
        page: u64,
        #[arg(long, default_value = "20")]
        page_size: u64,
    },
    /// Show a user's unread count
    Unread {
        #[arg(short, long)]
        user: UserId,
    },
    /// Mark one notification as read
    Read {
        #[arg(short, long)]
        user: UserId,
        /// Notification id
        id: NotificationId,
    },
    /// Mark every notification of a user as read
    ReadAll {
        #[arg(short, long)]
        user: UserId,
    },
    /// Soft-delete one notification
    Delete {
        #[arg(short, long)]
        user: UserId,
        /// Notification id
        id: NotificationId,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Read")]
    read: bool,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.get(),
            created: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
            tag: n.url.clone(),
            title: n.title.clone(),
            message: n
                .message
                .as_deref()
                .unwrap_or_default()
                .chars()
                .take(60)
                .collect(),
            read: !n.is_unread(),
        }
    }
}

/// Execute notification commands
pub async fn execute(args: &NotificationsArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;
    let pool = super::create_db_pool(&config).await?;
    let service = NotificationService::new(Arc::new(NotificationRepository::new(
        pool.pool().clone(),
    )));

    let result = run(&args.command, &service, cli).await;
    pool.close().await;
    result
}

async fn run(
    command: &NotificationsCommand,
    service: &NotificationService,
    cli: &Cli,
) -> Result<(), AppError> {
    match command {
        NotificationsCommand::List {
            user,
            page,
            page_size,
        } => {
            let request = PageRequest::try_new(*page, *page_size)?;
            let page = service.list_notifications(*user, &request).await?;
            let rows: Vec<NotificationRow> = page.items.iter().map(NotificationRow::from).collect();
            output::print_list(&rows, cli.format);
            output::print_kv(
                "Page",
                &format!("{} of {} ({} total)", page.page, page.total_pages(), page.total_items),
            );
        }
        NotificationsCommand::Unread { user } => {
            let count = service.unread_count(*user).await?;
            output::print_kv("Unread", &count.to_string());
        }
        NotificationsCommand::Read { user, id } => {
            if service.mark_read(*user, *id).await? {
                output::print_success(&format!("Notification {} marked read", id));
            } else {
                return Err(AppError::not_found(format!(
                    "Notification {} not found for user {}",
                    id, user
                )));
            }
        }
        NotificationsCommand::ReadAll { user } => {
            service.mark_all_read(*user).await?;
            output::print_success(&format!("All notifications of user {} marked read", user));
        }
        NotificationsCommand::Delete { user, id } => {
            if service.delete(*user, *id).await? {
                output::print_success(&format!("Notification {} deleted", id));
            } else {
                return Err(AppError::not_found(format!(
                    "Notification {} not found for user {}",
                    id, user
                )));
            }
        }
    }
    Ok(())
}
