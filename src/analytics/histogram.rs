use chrono::Duration;
use serde::Serialize;

use super::error::AnalysisError;
use crate::github::types::PullRequest;

/// Bar length of the fullest bucket.
pub const BAR_SCALE: usize = 20;

/// Merge-time buckets in ascending order. Upper bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBucket {
    UnderHour,
    HourToDay,
    DayToWeek,
    WeekToMonth,
    OverMonth,
}

impl DurationBucket {
    pub const ALL: [DurationBucket; 5] = [
        DurationBucket::UnderHour,
        DurationBucket::HourToDay,
        DurationBucket::DayToWeek,
        DurationBucket::WeekToMonth,
        DurationBucket::OverMonth,
    ];

    /// Exclusive upper bound; `None` for the open-ended last bucket.
    pub fn upper_bound(self) -> Option<Duration> {
        match self {
            DurationBucket::UnderHour => Some(Duration::hours(1)),
            DurationBucket::HourToDay => Some(Duration::days(1)),
            DurationBucket::DayToWeek => Some(Duration::weeks(1)),
            DurationBucket::WeekToMonth => Some(Duration::days(30)),
            DurationBucket::OverMonth => None,
        }
    }

    /// First bucket whose bound is strictly greater than `d`.
    pub fn for_duration(d: Duration) -> Self {
        Self::ALL
            .into_iter()
            .find(|b| b.upper_bound().map_or(true, |bound| d < bound))
            .unwrap_or(DurationBucket::OverMonth)
    }

    pub fn label(self) -> &'static str {
        match self {
            DurationBucket::UnderHour => "< 1h",
            DurationBucket::HourToDay => "1h - 1d",
            DurationBucket::DayToWeek => "1d - 1w",
            DurationBucket::WeekToMonth => "1w - 1mo",
            DurationBucket::OverMonth => "> 1mo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub bucket: DurationBucket,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    pub buckets: Vec<BucketCount>,
    pub max_count: usize,
}

impl Histogram {
    /// Bar length for `count`, scaled so the fullest bucket gets [`BAR_SCALE`].
    pub fn bar_length(&self, count: usize) -> usize {
        if self.max_count == 0 {
            0
        } else {
            count * BAR_SCALE / self.max_count
        }
    }
}

/// Count merged PRs per merge-time bucket.
pub fn histogram(prs: &[PullRequest]) -> Result<Histogram, AnalysisError> {
    let mut counts = [0usize; DurationBucket::ALL.len()];
    let mut total = 0;

    for d in prs.iter().filter_map(|pr| pr.merge_duration()) {
        let bucket = DurationBucket::for_duration(d);
        counts[bucket as usize] += 1;
        total += 1;
    }

    if total == 0 {
        return Err(AnalysisError::EmptySample);
    }

    Ok(Histogram {
        max_count: counts.iter().copied().max().unwrap_or(0),
        buckets: DurationBucket::ALL
            .into_iter()
            .zip(counts)
            .map(|(bucket, count)| BucketCount { bucket, count })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::fixtures::merged_pr;

    #[test]
    fn test_boundaries_go_to_next_bucket() {
        assert_eq!(DurationBucket::for_duration(Duration::minutes(59)), DurationBucket::UnderHour);
        assert_eq!(DurationBucket::for_duration(Duration::hours(1)), DurationBucket::HourToDay);
        assert_eq!(DurationBucket::for_duration(Duration::days(1)), DurationBucket::DayToWeek);
        assert_eq!(DurationBucket::for_duration(Duration::weeks(1)), DurationBucket::WeekToMonth);
        assert_eq!(DurationBucket::for_duration(Duration::days(30)), DurationBucket::OverMonth);
        assert_eq!(DurationBucket::for_duration(Duration::zero()), DurationBucket::UnderHour);
    }

    #[test]
    fn test_empty_sample() {
        assert_eq!(histogram(&[]), Err(AnalysisError::EmptySample));
    }

    #[test]
    fn test_counts_and_bars() {
        let prs = vec![
            merged_pr(1, 2),
            merged_pr(2, 3),
            merged_pr(3, 5),
            merged_pr(4, 48),
            merged_pr(5, 24 * 40),
        ];
        let hist = histogram(&prs).unwrap();
        let counts: Vec<usize> = hist.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![0, 3, 1, 0, 1]);
        assert_eq!(hist.max_count, 3);
        assert_eq!(hist.bar_length(3), 20);
        assert_eq!(hist.bar_length(1), 6);
        assert_eq!(hist.bar_length(0), 0);
    }
}
