use chrono::Duration;
use serde::Serialize;

use super::error::AnalysisError;
use super::mean_duration;
use crate::github::types::{clamp_non_negative, PullRequest};

/// Merge time split into "waiting for a first review" and "in review".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewPhases {
    /// Merged PRs that received at least one review
    pub reviewed: usize,
    /// All merged PRs in the sample
    pub total: usize,
    /// `None` when nothing was reviewed (direct merges)
    pub averages: Option<PhaseAverages>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseAverages {
    /// Creation to first review (triage speed)
    #[serde(with = "super::serde_seconds")]
    pub wait: Duration,
    /// First review to merge
    #[serde(with = "super::serde_seconds")]
    pub review: Duration,
}

/// Triage wait and active review time for one merged PR, if it was reviewed.
pub fn phases(pr: &PullRequest) -> Option<(Duration, Duration)> {
    let merged_at = pr.merged_at?;
    let first_review = pr.first_review_at?;
    let wait = clamp_non_negative(first_review - pr.created_at);
    let review = clamp_non_negative(merged_at - first_review);
    Some((wait, review))
}

/// Average the two phases over reviewed PRs only.
///
/// Unreviewed PRs count toward `total` but never pull the means toward zero.
pub fn review_phases(prs: &[PullRequest]) -> Result<ReviewPhases, AnalysisError> {
    let total = prs.iter().filter(|pr| pr.is_merged()).count();
    if total == 0 {
        return Err(AnalysisError::EmptySample);
    }

    let (total_wait, total_review, reviewed) = prs.iter().filter_map(phases).fold(
        (Duration::zero(), Duration::zero(), 0usize),
        |(wait_sum, review_sum, n), (wait, review)| (wait_sum + wait, review_sum + review, n + 1),
    );

    let averages = (reviewed > 0).then(|| PhaseAverages {
        wait: mean_duration(total_wait, reviewed),
        review: mean_duration(total_review, reviewed),
    });

    Ok(ReviewPhases {
        reviewed,
        total,
        averages,
    })
}
