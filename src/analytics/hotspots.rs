//! Directory hotspots: where in the tree do merges take longest.

use chrono::Duration;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::{mean_duration, rank_by};
use crate::github::types::PullRequest;

/// Group for files that live directly at the repository root.
pub const ROOT_FILES_GROUP: &str = "(root files)";

/// How many hotspots are reported.
pub const TOP_HOTSPOTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotspot {
    pub directory: String,
    #[serde(with = "super::serde_seconds")]
    pub mean: Duration,
    pub pr_count: usize,
}

#[derive(Debug, Default)]
struct GroupTotals {
    total: Duration,
    count: usize,
}

/// First path component, or the root sentinel for top-level files.
pub fn top_level_group(path: &str) -> &str {
    match path.split_once('/') {
        Some((head, _)) => head,
        None => ROOT_FILES_GROUP,
    }
}

/// Average merge time per top-level directory, slowest first.
///
/// A PR touching several files under one directory counts once for it.
/// PRs with no file paths contribute to nothing.
pub fn hotspots(prs: &[PullRequest]) -> Vec<Hotspot> {
    let mut groups: BTreeMap<&str, GroupTotals> = BTreeMap::new();

    for pr in prs {
        let Some(duration) = pr.merge_duration() else {
            continue;
        };
        let touched: BTreeSet<&str> = pr.file_paths.iter().map(|p| top_level_group(p)).collect();
        for dir in touched {
            let entry = groups.entry(dir).or_default();
            entry.total = entry.total + duration;
            entry.count += 1;
        }
    }

    let all: Vec<Hotspot> = groups
        .into_iter()
        .map(|(dir, totals)| Hotspot {
            directory: dir.to_string(),
            mean: mean_duration(totals.total, totals.count),
            pr_count: totals.count,
        })
        .collect();

    rank_by(all, |h| h.mean, |h| h.directory.clone())
        .into_iter()
        .take(TOP_HOTSPOTS)
        .collect()
}
