use serde::Serialize;
use std::collections::BTreeMap;

use crate::analytics::error::AnalysisError;
use crate::analytics::rank_by;
use crate::github::types::PullRequest;

/// Share (percent) at or above which one reviewer is a single point of failure.
pub const CRITICAL_SHARE: f64 = 50.0;
/// Share above which a reviewer is carrying too much.
pub const HIGH_LOAD_SHARE: f64 = 30.0;
/// Shares at or below this are not reported.
pub const REPORT_FLOOR_SHARE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadLevel {
    Critical,
    HighLoad,
    Notable,
}

impl LoadLevel {
    /// Tier for a review share in percent; `None` below the reporting floor.
    pub fn classify(share: f64) -> Option<Self> {
        if share >= CRITICAL_SHARE {
            Some(LoadLevel::Critical)
        } else if share > HIGH_LOAD_SHARE {
            Some(LoadLevel::HighLoad)
        } else if share > REPORT_FLOOR_SHARE {
            Some(LoadLevel::Notable)
        } else {
            None
        }
    }

    pub fn is_risk(self) -> bool {
        matches!(self, LoadLevel::Critical | LoadLevel::HighLoad)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewerLoad {
    pub reviewer: String,
    pub reviews: usize,
    /// Percent of all reviews
    pub share: f64,
    pub level: LoadLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroReport {
    pub total_reviews: usize,
    /// Reviewers above the reporting floor, heaviest first
    pub reviewers: Vec<ReviewerLoad>,
}

impl HeroReport {
    /// Nobody holds more than the reporting floor.
    pub fn is_well_distributed(&self) -> bool {
        self.reviewers.is_empty()
    }
}

/// Concentration of review work across open PRs.
///
/// # Errors
///
/// [`AnalysisError::EmptySample`] when no open PR has a review.
pub fn hero_load(prs: &[PullRequest]) -> Result<HeroReport, AnalysisError> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for pr in prs.iter().filter(|pr| !pr.is_merged()) {
        for reviewer in &pr.reviewers {
            *counts.entry(reviewer.as_str()).or_default() += 1;
        }
    }

    let total_reviews: usize = counts.values().sum();
    if total_reviews == 0 {
        return Err(AnalysisError::EmptySample);
    }

    let loads: Vec<ReviewerLoad> = counts
        .into_iter()
        .filter_map(|(reviewer, reviews)| {
            let share = reviews as f64 / total_reviews as f64 * 100.0;
            LoadLevel::classify(share).map(|level| ReviewerLoad {
                reviewer: reviewer.to_string(),
                reviews,
                share,
                level,
            })
        })
        .collect();

    Ok(HeroReport {
        total_reviews,
        reviewers: rank_by(loads, |l| l.reviews, |l| l.reviewer.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::fixtures::{merged_pr, open_pr, set};

    fn reviewed(number: u64, reviewers: &[&str]) -> PullRequest {
        let mut pr = open_pr(number);
        pr.reviewers = set(reviewers);
        pr
    }

    #[test]
    fn test_no_reviews() {
        let prs = vec![open_pr(1), open_pr(2)];
        assert_eq!(hero_load(&prs), Err(AnalysisError::EmptySample));
    }

    #[test]
    fn test_exactly_half_is_critical() {
        let prs = vec![
            reviewed(1, &["alice", "bob"]),
            reviewed(2, &["alice", "carol"]),
        ];
        let report = hero_load(&prs).unwrap();
        assert_eq!(report.total_reviews, 4);
        assert_eq!(report.reviewers[0].reviewer, "alice");
        assert_eq!(report.reviewers[0].level, LoadLevel::Critical);
        // bob and carol hold 25% each
        assert_eq!(report.reviewers[1].level, LoadLevel::Notable);
        assert_eq!(report.reviewers[1].reviewer, "bob");
        assert_eq!(report.reviewers[2].reviewer, "carol");
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(LoadLevel::classify(60.0), Some(LoadLevel::Critical));
        assert_eq!(LoadLevel::classify(50.0), Some(LoadLevel::Critical));
        assert_eq!(LoadLevel::classify(49.9), Some(LoadLevel::HighLoad));
        assert_eq!(LoadLevel::classify(30.0), Some(LoadLevel::Notable));
        assert_eq!(LoadLevel::classify(20.1), Some(LoadLevel::Notable));
        assert_eq!(LoadLevel::classify(20.0), None);
    }

    #[test]
    fn test_well_distributed() {
        let prs = vec![
            reviewed(1, &["a", "b", "c"]),
            reviewed(2, &["d", "e", "f"]),
        ];
        let report = hero_load(&prs).unwrap();
        assert!(report.is_well_distributed());
        assert_eq!(report.total_reviews, 6);
    }

    #[test]
    fn test_merged_prs_not_counted() {
        let mut merged = merged_pr(1, 4);
        merged.reviewers = set(&["alice"]);
        let prs = vec![merged, reviewed(2, &["bob"])];
        let report = hero_load(&prs).unwrap();
        assert_eq!(report.total_reviews, 1);
        assert_eq!(report.reviewers[0].reviewer, "bob");
    }
}
