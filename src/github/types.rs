use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One pull request as seen by the analytics engine.
///
/// `merged_at` is `None` for open PRs; `first_review_at` is `None` when no
/// review was ever submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub first_review_at: Option<DateTime<Utc>>,
    pub additions: u64,         // Lines added
    pub deletions: u64,         // Lines deleted
    pub file_paths: Vec<String>, // May be truncated by the fetcher
    pub reviewers: BTreeSet<String>,           // Submitted a review, never the author
    pub requested_reviewers: BTreeSet<String>, // Still pending at fetch time
}

impl PullRequest {
    /// Total size (additions + deletions)
    pub fn size(&self) -> u64 {
        self.additions + self.deletions
    }

    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }

    /// Creation-to-merge time, clamped at zero. `None` for unmerged PRs.
    pub fn merge_duration(&self) -> Option<Duration> {
        self.merged_at
            .map(|merged| clamp_non_negative(merged - self.created_at))
    }

    /// Time since the PR was opened
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }

    /// Time since the last recorded activity
    pub fn inactivity_at(&self, now: DateTime<Utc>) -> Duration {
        now - self.updated_at
    }
}

/// Clock skew can put timestamps out of order; never let that go negative.
pub fn clamp_non_negative(d: Duration) -> Duration {
    d.max(Duration::zero())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Fixed reference instant so tests never depend on the wall clock
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    pub fn open_pr(number: u64) -> PullRequest {
        PullRequest {
            number,
            title: format!("PR #{}", number),
            author: "author".to_string(),
            created_at: now() - Duration::hours(1),
            updated_at: now() - Duration::hours(1),
            merged_at: None,
            first_review_at: None,
            additions: 10,
            deletions: 5,
            file_paths: vec![],
            reviewers: BTreeSet::new(),
            requested_reviewers: BTreeSet::new(),
        }
    }

    /// Merged PR that took `hours` to merge, merged at `merged_at`
    pub fn merged_pr_at(number: u64, merged_at: DateTime<Utc>, hours: i64) -> PullRequest {
        PullRequest {
            created_at: merged_at - Duration::hours(hours),
            updated_at: merged_at,
            merged_at: Some(merged_at),
            ..open_pr(number)
        }
    }

    pub fn merged_pr(number: u64, hours: i64) -> PullRequest {
        merged_pr_at(number, now() - Duration::days(1), hours)
    }

    pub fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }
}
