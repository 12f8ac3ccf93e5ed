use chrono::Duration;
use serde::Serialize;

use super::error::AnalysisError;
use super::{mean_duration, merge_durations};
use crate::github::types::PullRequest;

/// Baseline creation-to-merge figures for the merged population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralStats {
    pub count: usize,
    #[serde(with = "super::serde_seconds")]
    pub mean: Duration,
    #[serde(with = "super::serde_seconds")]
    pub median: Duration,
    #[serde(with = "super::serde_seconds")]
    pub min: Duration,
    #[serde(with = "super::serde_seconds")]
    pub max: Duration,
}

/// Count, mean, median, min and max of merge duration.
///
/// # Errors
///
/// [`AnalysisError::EmptySample`] when no merged PR is present.
pub fn general_stats(prs: &[PullRequest]) -> Result<GeneralStats, AnalysisError> {
    let mut durations = merge_durations(prs);
    durations.sort();

    let (Some(&min), Some(&max)) = (durations.first(), durations.last()) else {
        return Err(AnalysisError::EmptySample);
    };

    let total = durations.iter().fold(Duration::zero(), |acc, d| acc + *d);

    Ok(GeneralStats {
        count: durations.len(),
        mean: mean_duration(total, durations.len()),
        median: median(&durations),
        min,
        max,
    })
}

/// Median of an already sorted, non-empty slice.
fn median(sorted: &[Duration]) -> Duration {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2
    } else {
        sorted[mid]
    }
}
