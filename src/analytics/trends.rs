use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::mean_duration;
use crate::github::types::PullRequest;

/// A calendar month in UTC. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Direction of a month relative to the month before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Degrading,
    Flat,
}

impl TrendDirection {
    fn between(previous: Duration, current: Duration) -> Self {
        if current < previous {
            TrendDirection::Improving
        } else if current > previous {
            TrendDirection::Degrading
        } else {
            TrendDirection::Flat
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    pub month: MonthKey,
    #[serde(with = "super::serde_seconds")]
    pub mean: Duration,
    pub count: usize,
    /// `None` for the first month in the series
    pub direction: Option<TrendDirection>,
}

/// Average merge time per calendar month of merge, oldest month first.
pub fn monthly_trends(prs: &[PullRequest]) -> Vec<MonthlyTrend> {
    let mut months: BTreeMap<MonthKey, (Duration, usize)> = BTreeMap::new();

    for pr in prs {
        let (Some(merged_at), Some(duration)) = (pr.merged_at, pr.merge_duration()) else {
            continue;
        };
        let entry = months
            .entry(MonthKey::of(merged_at))
            .or_insert((Duration::zero(), 0));
        entry.0 = entry.0 + duration;
        entry.1 += 1;
    }

    let mut previous: Option<Duration> = None;
    months
        .into_iter()
        .map(|(month, (total, count))| {
            let mean = mean_duration(total, count);
            let direction = previous.map(|prev| TrendDirection::between(prev, mean));
            previous = Some(mean);
            MonthlyTrend {
                month,
                mean,
                count,
                direction,
            }
        })
        .collect()
}
