use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analytics::rank_by;
use crate::github::types::PullRequest;

/// PRs younger than this are skipped; their review requests are still fresh.
pub const GHOST_AFTER: Duration = Duration::hours(48);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GhostReviewer {
    pub reviewer: String,
    /// Open PRs older than 48h still waiting on this reviewer
    pub blocked_prs: usize,
}

/// Requested reviewers who have not acted on PRs open for more than 48h.
///
/// Submitting a review removes a reviewer from the requested set upstream,
/// so anyone still requested has not responded.
pub fn ghost_reviewers(prs: &[PullRequest], now: DateTime<Utc>) -> Vec<GhostReviewer> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for pr in prs
        .iter()
        .filter(|pr| !pr.is_merged() && pr.age_at(now) > GHOST_AFTER)
    {
        for reviewer in &pr.requested_reviewers {
            *counts.entry(reviewer.as_str()).or_default() += 1;
        }
    }

    let ghosts: Vec<GhostReviewer> = counts
        .into_iter()
        .map(|(reviewer, blocked_prs)| GhostReviewer {
            reviewer: reviewer.to_string(),
            blocked_prs,
        })
        .collect();

    rank_by(ghosts, |g| g.blocked_prs, |g| g.reviewer.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::fixtures::{now, open_pr, set};

    fn requested(number: u64, age_hours: i64, reviewers: &[&str]) -> PullRequest {
        let mut pr = open_pr(number);
        pr.created_at = now() - Duration::hours(age_hours);
        pr.requested_reviewers = set(reviewers);
        pr
    }

    #[test]
    fn test_only_pending_reviewer_counted() {
        // A reviewed and dropped out of the requested set; B is still pending
        let mut pr = requested(1, 72, &["B"]);
        pr.reviewers = set(&["A"]);
        let ghosts = ghost_reviewers(&[pr], now());
        assert_eq!(
            ghosts,
            vec![GhostReviewer {
                reviewer: "B".to_string(),
                blocked_prs: 1
            }]
        );
    }

    #[test]
    fn test_fresh_prs_skipped() {
        let prs = vec![requested(1, 47, &["A"]), requested(2, 48, &["A"])];
        assert!(ghost_reviewers(&prs, now()).is_empty());
    }

    #[test]
    fn test_ranked_by_blocked_count() {
        let prs = vec![
            requested(1, 100, &["zoe", "yan"]),
            requested(2, 100, &["zoe"]),
            requested(3, 100, &["abe"]),
        ];
        let names: Vec<(String, usize)> = ghost_reviewers(&prs, now())
            .into_iter()
            .map(|g| (g.reviewer, g.blocked_prs))
            .collect();
        assert_eq!(
            names,
            vec![
                ("zoe".to_string(), 2),
                ("abe".to_string(), 1),
                ("yan".to_string(), 1)
            ]
        );
    }
}
