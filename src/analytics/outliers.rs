use crate::github::types::PullRequest;

/// Samples smaller than this are returned untouched.
pub const MIN_TRIM_SAMPLE: usize = 4;

/// Fraction trimmed from each tail.
pub const TRIM_FRACTION: f64 = 0.05;

/// Number of records removed from each tail for a sample of `n`.
///
/// Always at least one once trimming applies, so small samples still lose
/// their extremes.
pub fn trim_count(n: usize) -> usize {
    if n < MIN_TRIM_SAMPLE {
        return 0;
    }
    ((n as f64 * TRIM_FRACTION).floor() as usize).max(1)
}

/// Drop the fastest and slowest 5% of merged PRs by merge duration.
///
/// Returns a new vector ordered by duration ascending; `prs` is left as is.
/// Records without a merge timestamp are not part of the merged population
/// and are dropped.
pub fn filter_outliers(prs: &[PullRequest]) -> Vec<PullRequest> {
    let mut merged: Vec<PullRequest> = prs.iter().filter(|pr| pr.is_merged()).cloned().collect();

    let cut = trim_count(merged.len());
    if cut == 0 {
        return merged;
    }

    merged.sort_by_key(|pr| pr.merge_duration());
    let keep = merged.len() - 2 * cut;
    merged.into_iter().skip(cut).take(keep).collect()
}
