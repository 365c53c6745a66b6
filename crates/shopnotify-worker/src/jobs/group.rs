//! Group purchase progress notifications.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use shopnotify_core::types::id::UserId;
use shopnotify_entity::commerce::{GroupJoin, GroupPurchase};
use shopnotify_entity::notification::{NewNotification, NotificationTag};

use crate::dedup::{DedupRule, Horizon};
use crate::error::JobExecutionError;
use crate::job::{Candidate, DetectionJob, JobContext};
use crate::kind::JobKind;
use crate::outcome::JobReport;

pub const JOIN_TITLE: &str = "👥 New member joined your group";
pub const ALMOST_TITLE: &str = "⏳ Almost there!";

/// Tells a group's creator that someone joined within the last hour.
///
/// Joins are collapsed per creator, and a creator hears about joins at
/// most once per 30 minutes.
#[derive(Debug, Clone)]
pub struct GroupJoinJob {
    ctx: JobContext,
}

impl GroupJoinJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }

    fn candidate(creator_id: UserId, joins: &[GroupJoin]) -> Option<Candidate> {
        let latest = joins.iter().max_by_key(|j| j.joined_at)?;
        let message = match joins.len() {
            1 => format!(
                "Someone just joined your group buy for {}. Only a few more to go!",
                latest.product_name
            ),
            n => format!(
                "{n} people just joined your group buy for {}. Only a few more to go!",
                latest.product_name
            ),
        };
        Some(Candidate::new(
            NewNotification::new(creator_id, JOIN_TITLE, message, NotificationTag::Group)
                .with_group(latest.group_id),
            DedupRule::new(
                NotificationTag::Group,
                Horizon::Window(Duration::minutes(30)),
            )
            .title_contains("New member joined"),
        ))
    }
}

#[async_trait]
impl DetectionJob for GroupJoinJob {
    fn kind(&self) -> JobKind {
        JobKind::GroupJoin
    }

    async fn run_at(&self, now: DateTime<Utc>) -> Result<JobReport, JobExecutionError> {
        let joins = self
            .ctx
            .commerce
            .group_joins_since(now - Duration::hours(1))
            .await
            .map_err(|e| JobExecutionError::query("loading group joins", e))?;

        let mut by_creator: BTreeMap<UserId, Vec<GroupJoin>> = BTreeMap::new();
        for join in joins {
            by_creator.entry(join.creator_id).or_default().push(join);
        }
        info!(creators = by_creator.len(), "Found new group joins");

        let candidates = by_creator
            .iter()
            .filter_map(|(creator, joins)| Self::candidate(*creator, joins))
            .collect();
        self.ctx.process(self.kind(), now, candidates).await
    }
}

/// Nudges every member of a group that has one or two slots left.
#[derive(Debug, Clone)]
pub struct GroupAlmostCompleteJob {
    ctx: JobContext,
}

impl GroupAlmostCompleteJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }

    /// Message token identifying the group.
    fn group_token(group: &GroupPurchase) -> String {
        format!("(group #{})", group.id)
    }

    fn candidate(group: &GroupPurchase, member: UserId) -> Candidate {
        let slots = group.open_slots();
        let noun = if slots == 1 { "spot" } else { "spots" };
        let message = format!(
            "Only {slots} {noun} left for {} {}. Invite a friend to complete it!",
            group.product_name,
            Self::group_token(group)
        );
        Candidate::new(
            NewNotification::new(member, ALMOST_TITLE, message, NotificationTag::Group)
                .with_group(group.id),
            DedupRule::new(
                NotificationTag::Group,
                Horizon::Window(Duration::hours(12)),
            )
            .title_contains("Almost there")
            .message_contains(Self::group_token(group)),
        )
    }
}

#[async_trait]
impl DetectionJob for GroupAlmostCompleteJob {
    fn kind(&self) -> JobKind {
        JobKind::GroupAlmostComplete
    }

    async fn run_at(&self, now: DateTime<Utc>) -> Result<JobReport, JobExecutionError> {
        let groups: Vec<GroupPurchase> = self
            .ctx
            .commerce
            .open_groups(now)
            .await
            .map_err(|e| JobExecutionError::query("loading open groups", e))?
            .into_iter()
            .filter(|g| g.is_almost_complete(now))
            .collect();
        info!(groups = groups.len(), "Found almost complete groups");

        let mut candidates = Vec::new();
        for group in &groups {
            match self.ctx.commerce.group_member_ids(group.id).await {
                Ok(members) => candidates.extend(
                    members
                        .into_iter()
                        .map(|member| Self::candidate(group, member)),
                ),
                Err(e) => {
                    warn!(group_id = %group.id, error = %e, "Failed to load group members");
                }
            }
        }
        self.ctx.process(self.kind(), now, candidates).await
    }
}

#[cfg(test)]
mod tests {
    use shopnotify_core::types::id::{GroupId, ProductId};

    use super::*;
    use crate::testing::Fixture;

    fn group(id: i64, creator: i64, required: i32, joined: i32) -> GroupPurchase {
        GroupPurchase {
            id: GroupId(id),
            creator_id: UserId(creator),
            product_id: ProductId(1),
            product_name: "Air Fryer".into(),
            required_members: required,
            joined_members: joined,
            ends_at: Utc::now() + Duration::days(1),
            is_closed: false,
            is_deleted: false,
        }
    }

    #[tokio::test]
    async fn test_joins_collapse_per_creator() {
        let f = Fixture::new();
        let now = Utc::now();
        f.commerce.add_group(group(1, 10, 6, 3));
        f.commerce.add_group_member(GroupId(1), UserId(11), now - Duration::minutes(20));
        f.commerce.add_group_member(GroupId(1), UserId(12), now - Duration::minutes(5));
        f.commerce.add_group_member(GroupId(1), UserId(13), now - Duration::hours(3));

        let job = GroupJoinJob::new(f.ctx.clone());
        let report = job.run_at(now).await.unwrap();
        assert_eq!(report.dispatched, 1);

        let sent = f.sent_to(10);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].group_context_id, Some(GroupId(1)));
        assert!(sent[0].message.as_deref().unwrap().starts_with("2 people"));

        let again = job.run_at(now).await.unwrap();
        assert_eq!(again.skipped, 1);
    }

    #[tokio::test]
    async fn test_almost_complete_notifies_each_member_once_per_group() {
        let f = Fixture::new();
        let now = Utc::now();
        f.commerce.add_group(group(1, 10, 5, 4));
        f.commerce.add_group(group(12, 10, 5, 4));
        f.commerce.add_group(group(3, 20, 10, 2));
        f.commerce.add_group_member(GroupId(1), UserId(11), now - Duration::days(1));
        f.commerce.add_group_member(GroupId(12), UserId(11), now - Duration::days(1));

        let job = GroupAlmostCompleteJob::new(f.ctx.clone());
        let report = job.run_at(now).await.unwrap();
        // creator 10 and member 11, in groups 1 and 12
        assert_eq!(report.dispatched, 4);
        assert!(f.sent_to(20).is_empty());
        assert!(
            f.sent_to(11)[0]
                .message
                .as_deref()
                .unwrap()
                .starts_with("Only 1 spot left for Air Fryer")
        );

        let again = job.run_at(now).await.unwrap();
        assert_eq!(again.skipped, 4);
    }
}
