use serde::Serialize;
use std::collections::BTreeMap;

use super::rank_by;
use crate::github::types::PullRequest;

/// How many authors are reported.
pub const TOP_AUTHORS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongTailAuthor {
    pub author: String,
    pub slow_prs: usize,
}

/// Size of the slow decile: 10% of the sample rounded down, at least one.
pub fn slow_decile_size(n: usize) -> usize {
    (n / 10).max(1)
}

/// The slowest merged PRs, longest first.
pub fn slow_decile(prs: &[PullRequest]) -> Vec<&PullRequest> {
    let mut merged: Vec<&PullRequest> = prs.iter().filter(|pr| pr.is_merged()).collect();
    if merged.is_empty() {
        return merged;
    }
    merged.sort_by(|a, b| b.merge_duration().cmp(&a.merge_duration()));
    merged.truncate(slow_decile_size(merged.len()));
    merged
}

/// Authors who show up most often among the slowest merges.
///
/// These are frequently the people carrying the hardest changes rather than
/// slow workers; the presentation layer says as much.
pub fn long_tail_authors(prs: &[PullRequest]) -> Vec<LongTailAuthor> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for pr in slow_decile(prs) {
        *counts.entry(pr.author.as_str()).or_default() += 1;
    }

    let authors: Vec<LongTailAuthor> = counts
        .into_iter()
        .map(|(author, slow_prs)| LongTailAuthor {
            author: author.to_string(),
            slow_prs,
        })
        .collect();

    rank_by(authors, |a| a.slow_prs, |a| a.author.clone())
        .into_iter()
        .take(TOP_AUTHORS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::fixtures::merged_pr;

    fn pr(number: u64, author: &str, hours: i64) -> PullRequest {
        let mut pr = merged_pr(number, hours);
        pr.author = author.to_string();
        pr
    }

    fn sample(n: u64) -> Vec<PullRequest> {
        (1..=n).map(|i| pr(i, "dev", i as i64)).collect()
    }

    #[test]
    fn test_decile_size() {
        assert_eq!(slow_decile_size(3), 1);
        assert_eq!(slow_decile_size(10), 1);
        assert_eq!(slow_decile_size(19), 1);
        assert_eq!(slow_decile_size(100), 10);
    }

    #[test]
    fn test_ten_prs_yield_one_slow_record() {
        let prs = sample(10);
        let slow = slow_decile(&prs);
        assert_eq!(slow.len(), 1);
        assert_eq!(slow[0].number, 10);
    }

    #[test]
    fn test_hundred_prs_yield_ten_slow_records() {
        let prs = sample(100);
        let slow = slow_decile(&prs);
        assert_eq!(slow.len(), 10);
        assert!(slow.iter().all(|pr| pr.number > 90));
    }

    #[test]
    fn test_empty_sample() {
        assert!(long_tail_authors(&[]).is_empty());
    }

    #[test]
    fn test_authors_ranked_by_slow_count() {
        let mut prs: Vec<PullRequest> = (1..=20).map(|i| pr(i, "fast", 1)).collect();
        prs.push(pr(21, "carol", 90));
        prs.push(pr(22, "bob", 100));
        prs.push(pr(23, "bob", 95));
        // 23 PRs -> slowest 2: both bob's
        let result = long_tail_authors(&prs);
        assert_eq!(
            result,
            vec![LongTailAuthor {
                author: "bob".to_string(),
                slow_prs: 2
            }]
        );
    }

    #[test]
    fn test_ties_broken_by_name() {
        let prs = vec![pr(1, "zed", 5)];
        let mut many: Vec<PullRequest> = (2..=30).map(|i| pr(i, "x", 1)).collect();
        many.extend(prs);
        many.push(pr(31, "amy", 5));
        many.push(pr(32, "kim", 5));
        // 32 PRs -> slowest 3: zed, amy, kim, one each
        let names: Vec<String> = long_tail_authors(&many).into_iter().map(|a| a.author).collect();
        assert_eq!(names, vec!["amy", "kim", "zed"]);
    }
}
