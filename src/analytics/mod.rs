//! Pure velocity analytics over already-fetched pull requests.
//!
//! Nothing in here performs I/O or reads the clock: every entry point takes
//! the records (and `now`, where it matters) as arguments. Aggregators sort
//! private copies, so they can run in any order over the same input.

pub mod correlation;
pub mod error;
pub mod forecast;
pub mod histogram;
pub mod hotspots;
pub mod long_tail;
pub mod outliers;
pub mod report;
pub mod review;
pub mod risk;
pub mod stats;
pub mod trends;

pub use correlation::{size_correlation, Correlation, CorrelationStrength};
pub use error::AnalysisError;
pub use forecast::{forecast, Forecast, ForecastTrend};
pub use histogram::{histogram, DurationBucket, Histogram};
pub use hotspots::{hotspots, Hotspot};
pub use long_tail::{long_tail_authors, LongTailAuthor};
pub use outliers::filter_outliers;
pub use report::{analyze, AnalysisInput, AnalysisOptions, OutlierTrim, VelocityReport};
pub use review::{review_phases, ReviewPhases};
pub use stats::{general_stats, GeneralStats};
pub use trends::{monthly_trends, MonthKey, MonthlyTrend, TrendDirection};

use chrono::Duration;
use std::cmp::Reverse;

use crate::github::types::PullRequest;

/// Merge durations of the merged records in `prs`, input order.
pub(crate) fn merge_durations(prs: &[PullRequest]) -> Vec<Duration> {
    prs.iter().filter_map(|pr| pr.merge_duration()).collect()
}

/// Mean of `count` durations summing to `total`, millisecond precision.
pub(crate) fn mean_duration(total: Duration, count: usize) -> Duration {
    if count == 0 {
        return Duration::zero();
    }
    Duration::milliseconds(total.num_milliseconds() / count as i64)
}

/// Sort by `metric` descending, breaking ties by `key` ascending.
///
/// Grouped results are ranked through here so output never depends on
/// map iteration order.
pub(crate) fn rank_by<T, M, K>(
    mut items: Vec<T>,
    metric: impl Fn(&T) -> M,
    key: impl Fn(&T) -> K,
) -> Vec<T>
where
    M: Ord,
    K: Ord,
{
    items.sort_by_key(|item| (Reverse(metric(item)), key(item)));
    items
}

/// Durations serialize as whole seconds.
pub(crate) mod serde_seconds {
    use chrono::Duration;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(d.num_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_duration() {
        assert_eq!(mean_duration(Duration::hours(9), 3), Duration::hours(3));
        assert_eq!(mean_duration(Duration::hours(9), 0), Duration::zero());
    }

    #[test]
    fn test_rank_by_metric_then_key() {
        let items = vec![("b", 2), ("c", 5), ("a", 2)];
        let ranked = rank_by(items, |(_, n)| *n, |(k, _)| *k);
        assert_eq!(ranked, vec![("c", 5), ("a", 2), ("b", 2)]);
    }
}
