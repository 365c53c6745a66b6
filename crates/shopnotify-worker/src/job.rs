//! The detection job contract and the shared candidate pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use shopnotify_database::traits::CommerceQuery;
use shopnotify_entity::notification::NewNotification;
use shopnotify_service::notification::NotificationDispatcher;

use crate::dedup::DedupRule;
use crate::error::JobExecutionError;
use crate::kind::JobKind;
use crate::outcome::{CandidateOutcome, JobReport, SkipReason};

/// A scheduled scan for one notification category.
///
/// Runs are stateless and safe to repeat: every candidate is checked
/// against the store before it is dispatched.
#[async_trait]
pub trait DetectionJob: Send + Sync + std::fmt::Debug {
    /// The job's name.
    fn kind(&self) -> JobKind;

    /// Run against the given instant.
    async fn run_at(&self, now: DateTime<Utc>) -> Result<JobReport, JobExecutionError>;

    /// Run against the current instant.
    async fn run(&self) -> Result<JobReport, JobExecutionError> {
        self.run_at(Utc::now()).await
    }
}

/// A notification a job would like to send, with the rule that suppresses it.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub notification: NewNotification,
    pub dedup: DedupRule,
}

impl Candidate {
    pub fn new(notification: NewNotification, dedup: DedupRule) -> Self {
        Self {
            notification,
            dedup,
        }
    }
}

/// Collaborators shared by every job.
#[derive(Debug, Clone)]
pub struct JobContext {
    pub commerce: Arc<dyn CommerceQuery>,
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Candidates processed at once within a run.
    pub concurrency: usize,
}

impl JobContext {
    pub fn new(
        commerce: Arc<dyn CommerceQuery>,
        dispatcher: Arc<NotificationDispatcher>,
        concurrency: usize,
    ) -> Self {
        Self {
            commerce,
            dispatcher,
            concurrency: concurrency.max(1),
        }
    }

    /// Dedup-check and dispatch every candidate, then summarize.
    ///
    /// Candidates are independent: one failing never stops the others.
    pub async fn process(
        &self,
        job: JobKind,
        now: DateTime<Utc>,
        candidates: Vec<Candidate>,
    ) -> Result<JobReport, JobExecutionError> {
        let started_at = Utc::now();
        let outcomes: Vec<CandidateOutcome> = stream::iter(candidates)
            .map(|candidate| self.notify_once(job, candidate, now))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let report = JobReport::from_outcomes(job, started_at, outcomes);
        report.log();
        report.into_result()
    }

    async fn notify_once(
        &self,
        job: JobKind,
        candidate: Candidate,
        now: DateTime<Utc>,
    ) -> CandidateOutcome {
        let user_id = candidate.notification.user_id;
        let filter = candidate.dedup.filter(user_id, now);

        match self.dispatcher.store().exists_matching(&filter).await {
            Ok(true) => {
                debug!(job = %job, user_id = %user_id, "Already notified, skipping");
                return CandidateOutcome::Skipped(SkipReason::Duplicate);
            }
            Ok(false) => {}
            Err(e) => {
                warn!(job = %job, user_id = %user_id, error = %e, "Dedup check failed");
                return CandidateOutcome::Failed(e);
            }
        }

        match self.dispatcher.dispatch_new(&candidate.notification).await {
            Ok(notification) => CandidateOutcome::Dispatched(notification.id),
            Err(e) => {
                warn!(job = %job, user_id = %user_id, error = %e, "Dispatch failed");
                CandidateOutcome::Failed(e)
            }
        }
    }
}
