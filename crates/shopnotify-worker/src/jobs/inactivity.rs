//! Win-back message for accounts idle for a week.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use shopnotify_entity::notification::{NewNotification, NotificationTag};

use crate::dedup::{DedupRule, Horizon};
use crate::error::JobExecutionError;
use crate::job::{Candidate, DetectionJob, JobContext};
use crate::kind::JobKind;
use crate::outcome::JobReport;

pub const TITLE: &str = "👋 We miss you!";

const IDLE_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct InactivityJob {
    ctx: JobContext,
}

impl InactivityJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl DetectionJob for InactivityJob {
    fn kind(&self) -> JobKind {
        JobKind::Inactivity
    }

    async fn run_at(&self, now: DateTime<Utc>) -> Result<JobReport, JobExecutionError> {
        let users = self
            .ctx
            .commerce
            .users_inactive_since(now - Duration::days(IDLE_DAYS))
            .await
            .map_err(|e| JobExecutionError::query("loading inactive users", e))?;
        info!(users = users.len(), "Found inactive users");

        let rule = DedupRule::new(
            NotificationTag::Account,
            Horizon::Window(Duration::days(IDLE_DAYS)),
        )
        .title_contains("miss you");
        let candidates = users
            .iter()
            .map(|user| {
                let message = format!(
                    "Hi {}, it's been a while. Come see what's new in the shop!",
                    user.first_name()
                );
                Candidate::new(
                    NewNotification::new(user.id, TITLE, message, NotificationTag::Account),
                    rule.clone(),
                )
            })
            .collect();
        self.ctx.process(self.kind(), now, candidates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, user};

    #[tokio::test]
    async fn test_only_users_idle_for_a_week() {
        let f = Fixture::new();
        let now = Utc::now();
        f.commerce.add_user(user(1, now - Duration::days(8)));
        f.commerce.add_user(user(2, now - Duration::days(2)));

        let job = InactivityJob::new(f.ctx.clone());
        assert_eq!(job.run_at(now).await.unwrap().dispatched, 1);
        assert_eq!(
            f.sent_to(1)[0].message.as_deref(),
            Some("Hi Customer, it's been a while. Come see what's new in the shop!")
        );
        assert_eq!(job.run_at(now + Duration::days(6)).await.unwrap().skipped, 1);
    }
}
