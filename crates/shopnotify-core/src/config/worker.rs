//! Detection job worker configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Schedule value that disables a job.
pub const SCHEDULE_OFF: &str = "off";

/// Detection job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Attempts per scheduled run before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay in seconds between attempts.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,
    /// Upper bound in seconds for one attempt.
    #[serde(default = "default_job_timeout")]
    pub job_timeout_seconds: u64,
    /// Candidates processed concurrently within one job run.
    #[serde(default = "default_candidate_concurrency")]
    pub candidate_concurrency: usize,
    /// Cron expressions per job.
    #[serde(default)]
    pub schedules: JobSchedules,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: default_max_attempts(),
            retry_delay_seconds: default_retry_delay(),
            job_timeout_seconds: default_job_timeout(),
            candidate_concurrency: default_candidate_concurrency(),
            schedules: JobSchedules::default(),
        }
    }
}

impl WorkerConfig {
    /// Validate numeric bounds.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_attempts == 0 {
            return Err(AppError::configuration("worker.max_attempts must be at least 1"));
        }
        if self.candidate_concurrency == 0 {
            return Err(AppError::configuration(
                "worker.candidate_concurrency must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Six-field cron expressions (seconds first), or `"off"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSchedules {
    #[serde(default = "hourly")]
    pub cart_abandonment: String,
    #[serde(default = "every_15_minutes")]
    pub order_status: String,
    #[serde(default = "every_15_minutes")]
    pub group_join: String,
    #[serde(default = "hourly")]
    pub group_almost_complete: String,
    #[serde(default = "daily_10am")]
    pub recommendations: String,
    #[serde(default = "every_6_hours")]
    pub price_drop: String,
    #[serde(default = "hourly")]
    pub flash_sale: String,
    #[serde(default = "daily_11am")]
    pub return_reminder: String,
    #[serde(default = "daily_noon")]
    pub inactivity: String,
    #[serde(default = "monday_9am")]
    pub weekly_report: String,
    #[serde(default = "daily_8am")]
    pub birthday: String,
    #[serde(default = "every_6_hours")]
    pub restock: String,
    #[serde(default = "every_6_hours")]
    pub low_stock: String,
}

impl Default for JobSchedules {
    fn default() -> Self {
        Self {
            cart_abandonment: hourly(),
            order_status: every_15_minutes(),
            group_join: every_15_minutes(),
            group_almost_complete: hourly(),
            recommendations: daily_10am(),
            price_drop: every_6_hours(),
            flash_sale: hourly(),
            return_reminder: daily_11am(),
            inactivity: daily_noon(),
            weekly_report: monday_9am(),
            birthday: daily_8am(),
            restock: every_6_hours(),
            low_stock: every_6_hours(),
        }
    }
}

impl JobSchedules {
    /// Look up a schedule by job name.
    pub fn get(&self, job: &str) -> Option<&str> {
        let schedule = match job {
            "cart_abandonment" => &self.cart_abandonment,
            "order_status" => &self.order_status,
            "group_join" => &self.group_join,
            "group_almost_complete" => &self.group_almost_complete,
            "recommendations" => &self.recommendations,
            "price_drop" => &self.price_drop,
            "flash_sale" => &self.flash_sale,
            "return_reminder" => &self.return_reminder,
            "inactivity" => &self.inactivity,
            "weekly_report" => &self.weekly_report,
            "birthday" => &self.birthday,
            "restock" => &self.restock,
            "low_stock" => &self.low_stock,
            _ => return None,
        };
        Some(schedule.as_str())
    }
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    30
}

fn default_job_timeout() -> u64 {
    300
}

fn default_candidate_concurrency() -> usize {
    4
}

fn hourly() -> String {
    "0 0 * * * *".to_string()
}

fn every_15_minutes() -> String {
    "0 */15 * * * *".to_string()
}

fn every_6_hours() -> String {
    "0 0 */6 * * *".to_string()
}

fn daily_8am() -> String {
    "0 0 8 * * *".to_string()
}

fn daily_10am() -> String {
    "0 0 10 * * *".to_string()
}

fn daily_11am() -> String {
    "0 0 11 * * *".to_string()
}

fn daily_noon() -> String {
    "0 0 12 * * *".to_string()
}

fn monday_9am() -> String {
    "0 0 9 * * Mon".to_string()
}
