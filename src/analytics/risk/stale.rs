use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::github::types::PullRequest;

/// Inactivity beyond which an open PR is stale.
pub const STALE_AFTER: Duration = Duration::days(7);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StalePr {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub inactive_days: i64,
}

/// Open PRs untouched for more than a week, most neglected first.
///
/// An empty result means the board is clean.
pub fn stale_prs(prs: &[PullRequest], now: DateTime<Utc>) -> Vec<StalePr> {
    let mut stale: Vec<StalePr> = prs
        .iter()
        .filter(|pr| !pr.is_merged())
        .filter_map(|pr| {
            let idle = pr.inactivity_at(now);
            (idle > STALE_AFTER).then(|| StalePr {
                number: pr.number,
                title: pr.title.clone(),
                author: pr.author.clone(),
                inactive_days: idle.num_days(),
            })
        })
        .collect();

    stale.sort_by(|a, b| {
        b.inactive_days
            .cmp(&a.inactive_days)
            .then_with(|| a.number.cmp(&b.number))
    });
    stale
}
