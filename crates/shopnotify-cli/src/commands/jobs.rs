//! Detection job CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use shopnotify_core::config::worker::SCHEDULE_OFF;
use shopnotify_core::error::AppError;
use shopnotify_worker::{JobKind, JobRunner};

use super::Cli;
use crate::output;

/// Arguments for job commands
#[derive(Debug, Args)]
pub struct JobsArgs {
    /// Jobs subcommand
    #[command(subcommand)]
    pub command: JobsCommand,
}

/// Jobs subcommands
#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// List every job with its schedule
    List,
    /// Run one job now
    Run {
        /// Job name, e.g. cart_abandonment or cart-abandonment
        kind: JobKind,
        /// Retry transient failures like a scheduled run
        #[arg(long)]
        retry: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct JobRow {
    #[tabled(rename = "Job")]
    name: &'static str,
    #[tabled(rename = "Schedule")]
    schedule: String,
    #[tabled(rename = "Enabled")]
    enabled: bool,
    #[tabled(rename = "Description")]
    description: &'static str,
}

/// Execute job commands
pub async fn execute(args: &JobsArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;

    match &args.command {
        JobsCommand::List => {
            let rows: Vec<JobRow> = JobKind::ALL
                .iter()
                .map(|kind| {
                    let schedule = config
                        .worker
                        .schedules
                        .get(kind.as_str())
                        .unwrap_or(SCHEDULE_OFF)
                        .to_string();
                    JobRow {
                        name: kind.as_str(),
                        enabled: !schedule.eq_ignore_ascii_case(SCHEDULE_OFF),
                        schedule,
                        description: kind.description(),
                    }
                })
                .collect();
            output::print_list(&rows, cli.format);
            if !config.worker.enabled {
                output::print_warning("The scheduler is disabled (worker.enabled = false)");
            }
        }
        JobsCommand::Run { kind, retry } => {
            let pool = super::create_db_pool(&config).await?;
            let registry = super::build_registry(&config, &pool)?;

            let result = if *retry {
                let job = registry
                    .get(*kind)
                    .ok_or_else(|| AppError::not_found(format!("Job '{}' is not registered", kind)))?;
                JobRunner::from_config(&config.worker)
                    .run_with_retry(job.as_ref())
                    .await
            } else {
                registry.run(*kind).await
            };
            pool.close().await;

            let report = result.map_err(|e| AppError::internal(format!("Job {} failed: {}", kind, e)))?;
            output::print_item(&report, cli.format);
            if report.failed > 0 {
                for error in &report.errors {
                    output::print_warning(error);
                }
            }
        }
    }

    Ok(())
}
