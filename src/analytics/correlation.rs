use serde::Serialize;

use super::error::AnalysisError;
use crate::github::types::PullRequest;

/// Above this, size is the primary driver of merge time.
pub const STRONG_THRESHOLD: f64 = 0.5;
/// Above this (and up to [`STRONG_THRESHOLD`]), size contributes.
pub const MODERATE_THRESHOLD: f64 = 0.3;

/// Qualitative reading of the size/duration coefficient.
///
/// Only positive coefficients get distinct tiers; a strongly negative
/// coefficient reads as `Weak` just like one near zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
}

impl CorrelationStrength {
    pub fn classify(r: f64) -> Self {
        if r > STRONG_THRESHOLD {
            CorrelationStrength::Strong
        } else if r > MODERATE_THRESHOLD {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    pub sample_size: usize,
    pub coefficient: f64,
    pub strength: CorrelationStrength,
}

/// Pearson correlation between PR size (lines) and merge duration (hours).
///
/// Zero variance on either axis yields `r = 0`.
pub fn size_correlation(prs: &[PullRequest]) -> Result<Correlation, AnalysisError> {
    let points: Vec<(f64, f64)> = prs
        .iter()
        .filter_map(|pr| {
            pr.merge_duration()
                .map(|d| (pr.size() as f64, d.num_milliseconds() as f64 / 3_600_000.0))
        })
        .collect();

    if points.is_empty() {
        return Err(AnalysisError::EmptySample);
    }

    let coefficient = pearson(&points);
    Ok(Correlation {
        sample_size: points.len(),
        coefficient,
        strength: CorrelationStrength::classify(coefficient),
    })
}

/// Product-moment coefficient over `(x, y)` pairs.
///
/// Constant x or constant y yields 0.
pub fn pearson(points: &[(f64, f64)]) -> f64 {
    let Some(&(x0, y0)) = points.first() else {
        return 0.0;
    };
    // Checked exactly: fractional values leave rounding residue in the
    // variance terms, so the formula alone would not yield 0 here
    if points.iter().all(|&(x, _)| x == x0) || points.iter().all(|&(_, y)| y == y0) {
        return 0.0;
    }

    let n = points.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2, mut sum_y2) = (0.0, 0.0, 0.0, 0.0, 0.0);

    for &(x, y) in points {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
        sum_y2 += y * y;
    }

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 || denominator.is_nan() {
        return 0.0;
    }
    (numerator / denominator).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::fixtures::merged_pr;

    fn pr(number: u64, size: u64, hours: i64) -> PullRequest {
        let mut pr = merged_pr(number, hours);
        pr.additions = size;
        pr.deletions = 0;
        pr
    }

    #[test]
    fn test_empty_sample() {
        assert_eq!(size_correlation(&[]), Err(AnalysisError::EmptySample));
    }

    #[test]
    fn test_identical_sizes_give_zero() {
        let prs = vec![pr(1, 100, 2), pr(2, 100, 20), pr(3, 100, 7)];
        let result = size_correlation(&prs).unwrap();
        assert_eq!(result.coefficient, 0.0);
        assert_eq!(result.strength, CorrelationStrength::Weak);
    }

    #[test]
    fn test_identical_durations_give_zero() {
        // 66 minutes is 1.1h, which is not exact in binary floating point
        let prs: Vec<PullRequest> = (1..=10)
            .map(|i| {
                let mut pr = pr(i, i * 10, 0);
                pr.created_at = pr.merged_at.unwrap() - chrono::Duration::minutes(66);
                pr
            })
            .collect();
        let result = size_correlation(&prs).unwrap();
        assert_eq!(result.coefficient, 0.0);
        assert_eq!(result.strength, CorrelationStrength::Weak);
    }

    #[test]
    fn test_pearson_constant_axis() {
        assert_eq!(pearson(&[]), 0.0);
        assert_eq!(pearson(&[(1.0, 1.1), (2.0, 1.1), (3.0, 1.1)]), 0.0);
        assert_eq!(pearson(&[(0.7, 1.0), (0.7, 2.0), (0.7, 3.0)]), 0.0);
    }

    #[test]
    fn test_single_point_is_degenerate() {
        let result = size_correlation(&[pr(1, 50, 3)]).unwrap();
        assert_eq!(result.coefficient, 0.0);
    }

    #[test]
    fn test_perfect_positive() {
        let prs = vec![pr(1, 10, 1), pr(2, 20, 2), pr(3, 30, 3), pr(4, 40, 4)];
        let result = size_correlation(&prs).unwrap();
        assert!((result.coefficient - 1.0).abs() < 1e-9);
        assert_eq!(result.strength, CorrelationStrength::Strong);
    }

    #[test]
    fn test_strong_negative_reads_as_weak() {
        let prs = vec![pr(1, 10, 40), pr(2, 20, 30), pr(3, 30, 20), pr(4, 40, 10)];
        let result = size_correlation(&prs).unwrap();
        assert!((result.coefficient + 1.0).abs() < 1e-9);
        assert_eq!(result.strength, CorrelationStrength::Weak);
    }

    #[test]
    fn test_coefficient_in_range() {
        let prs: Vec<PullRequest> = (0..30)
            .map(|i| pr(i, (i * 7919) % 500, ((i * 31) % 97) as i64))
            .collect();
        let r = size_correlation(&prs).unwrap().coefficient;
        assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(CorrelationStrength::classify(0.51), CorrelationStrength::Strong);
        assert_eq!(CorrelationStrength::classify(0.5), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::classify(0.31), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::classify(0.3), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::classify(-0.9), CorrelationStrength::Weak);
    }
}
