//! Jobs whose trigger needs data the shop does not record yet.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::JobExecutionError;
use crate::job::DetectionJob;
use crate::kind::JobKind;
use crate::outcome::JobReport;

/// A registered job that never selects candidates.
///
/// Birthday needs a date of birth on the user; restock and low-stock need
/// an inventory level on the product. Until those fields exist the jobs
/// run on schedule and report zero candidates.
#[derive(Debug, Clone)]
pub struct PlaceholderJob {
    kind: JobKind,
    missing: &'static str,
}

impl PlaceholderJob {
    pub fn birthday() -> Self {
        Self {
            kind: JobKind::Birthday,
            missing: "user date of birth",
        }
    }

    pub fn restock() -> Self {
        Self {
            kind: JobKind::Restock,
            missing: "product inventory level",
        }
    }

    pub fn low_stock() -> Self {
        Self {
            kind: JobKind::LowStock,
            missing: "product inventory level",
        }
    }
}

#[async_trait]
impl DetectionJob for PlaceholderJob {
    fn kind(&self) -> JobKind {
        self.kind
    }

    async fn run_at(&self, _now: DateTime<Utc>) -> Result<JobReport, JobExecutionError> {
        debug!(job = %self.kind, missing = self.missing, "Job not yet wired, no candidates");
        Ok(JobReport::empty(self.kind, Utc::now()))
    }
}
