use chrono::{DateTime, Utc};
use serde::Serialize;

use super::correlation::{size_correlation, Correlation};
use super::error::AnalysisError;
use super::forecast::{forecast, Forecast};
use super::histogram::{histogram, Histogram};
use super::hotspots::{hotspots, Hotspot};
use super::long_tail::{long_tail_authors, LongTailAuthor};
use super::outliers::filter_outliers;
use super::review::{review_phases, ReviewPhases};
use super::risk::{ghost_reviewers, hero_load, stale_prs, GhostReviewer, HeroReport, StalePr};
use super::stats::{general_stats, GeneralStats};
use super::trends::{monthly_trends, MonthlyTrend};
use crate::github::types::PullRequest;

/// The two disjoint populations handed over by the fetcher.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub merged: &'a [PullRequest],
    pub open: &'a [PullRequest],
    /// Reference instant for the age-based risk detectors
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Trim the fastest and slowest 5% of merged PRs first
    pub exclude_outliers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutlierTrim {
    pub before: usize,
    pub after: usize,
}

/// Every metric for one run. Sections that could not be computed carry the
/// reason instead of a placeholder value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocityReport {
    pub merged_count: usize,
    pub open_count: usize,
    /// Present only when outlier trimming was requested
    pub outliers: Option<OutlierTrim>,
    pub general: Result<GeneralStats, AnalysisError>,
    pub review: Result<ReviewPhases, AnalysisError>,
    pub correlation: Result<Correlation, AnalysisError>,
    pub hotspots: Vec<Hotspot>,
    pub long_tail: Vec<LongTailAuthor>,
    pub trends: Vec<MonthlyTrend>,
    pub forecast: Result<Forecast, AnalysisError>,
    pub histogram: Result<Histogram, AnalysisError>,
    pub heroes: Result<HeroReport, AnalysisError>,
    pub stale: Vec<StalePr>,
    pub ghosts: Vec<GhostReviewer>,
}

/// Run every analysis over one snapshot.
///
/// Merged-PR sections read the outlier-filtered sample when trimming is on;
/// risk sections always read the raw open PRs.
pub fn analyze(input: AnalysisInput<'_>, options: AnalysisOptions) -> VelocityReport {
    let merged: Vec<PullRequest> = if options.exclude_outliers {
        filter_outliers(input.merged)
    } else {
        input.merged.iter().filter(|pr| pr.is_merged()).cloned().collect()
    };

    let outliers = options.exclude_outliers.then(|| OutlierTrim {
        before: input.merged.len(),
        after: merged.len(),
    });
    if let Some(trim) = outliers {
        log::debug!("Outlier filter: {} -> {} merged PRs", trim.before, trim.after);
    }

    let skipped = input.merged.iter().filter(|pr| !pr.is_merged()).count();
    if skipped > 0 {
        log::warn!("Ignoring {} unmerged record(s) in the merged population", skipped);
    }

    let trends = monthly_trends(&merged);
    let projection = forecast(&trends);

    VelocityReport {
        merged_count: merged.len(),
        open_count: input.open.len(),
        outliers,
        general: general_stats(&merged),
        review: review_phases(&merged),
        correlation: size_correlation(&merged),
        hotspots: hotspots(&merged),
        long_tail: long_tail_authors(&merged),
        trends,
        forecast: projection,
        histogram: histogram(&merged),
        heroes: hero_load(input.open),
        stale: stale_prs(input.open, input.now),
        ghosts: ghost_reviewers(input.open, input.now),
    }
}
