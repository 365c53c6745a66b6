//! Dedup rules applied before each dispatch.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use shopnotify_core::types::id::UserId;
use shopnotify_database::filter::NotificationFilter;
use shopnotify_entity::notification::NotificationTag;

/// How far back a prior notification suppresses a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    /// A rolling window ending now. A prior notification exactly at the
    /// window's start no longer counts.
    Window(Duration),
    /// Since the start of the current UTC day.
    CalendarDay,
}

impl Horizon {
    /// Exclusive lower bound on the creation time of a blocking notification.
    pub fn created_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Window(window) => now - *window,
            // midnight itself must still block
            Self::CalendarDay => {
                now.date_naive().and_time(NaiveTime::MIN).and_utc() - Duration::microseconds(1)
            }
        }
    }
}

/// A category's dedup key: tag plus optional distinguishing substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupRule {
    pub tag: NotificationTag,
    pub horizon: Horizon,
    pub title_contains: Option<String>,
    pub message_contains: Option<String>,
}

impl DedupRule {
    pub fn new(tag: NotificationTag, horizon: Horizon) -> Self {
        Self {
            tag,
            horizon,
            title_contains: None,
            message_contains: None,
        }
    }

    pub fn title_contains(mut self, needle: impl Into<String>) -> Self {
        self.title_contains = Some(needle.into());
        self
    }

    pub fn message_contains(mut self, needle: impl Into<String>) -> Self {
        self.message_contains = Some(needle.into());
        self
    }

    /// Store predicate for one user at `now`.
    pub fn filter(&self, user_id: UserId, now: DateTime<Utc>) -> NotificationFilter {
        let mut filter =
            NotificationFilter::new(user_id, self.horizon.created_after(now)).tag(self.tag);
        if let Some(needle) = &self.title_contains {
            filter = filter.title_contains(needle.clone());
        }
        if let Some(needle) = &self.message_contains {
            filter = filter.message_contains(needle.clone());
        }
        filter
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_window_horizon() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 15, 0, 0).unwrap();
        let h = Horizon::Window(Duration::hours(2));
        assert_eq!(
            h.created_after(now),
            Utc.with_ymd_and_hms(2026, 3, 4, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_calendar_day_includes_midnight() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 15, 30, 0).unwrap();
        let midnight = Utc.with_ymd_and_hms(2026, 3, 4, 0, 0, 0).unwrap();
        let after = Horizon::CalendarDay.created_after(now);
        assert!(after < midnight);
        assert!(after > midnight - Duration::seconds(1));
    }

    #[test]
    fn test_filter_carries_rule() {
        let now = Utc::now();
        let rule = DedupRule::new(NotificationTag::Orders, Horizon::Window(Duration::hours(2)))
            .title_contains("Order Delivered")
            .message_contains("TRK-1");
        let filter = rule.filter(UserId(7), now);
        assert_eq!(filter.user_id, UserId(7));
        assert_eq!(filter.tag, Some(NotificationTag::Orders));
        assert_eq!(filter.title_contains.as_deref(), Some("Order Delivered"));
        assert_eq!(filter.message_contains.as_deref(), Some("TRK-1"));
        assert_eq!(filter.created_after, now - Duration::hours(2));
    }
}
