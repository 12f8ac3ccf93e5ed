use anyhow::{Context, Result};
use octocrab::Octocrab;

use crate::github::types::PullRequest;
use crate::github::{fetch_pull_requests, FetchOptions, PrState, RepoSlug};

/// Both populations for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub merged: Vec<PullRequest>,
    pub open: Vec<PullRequest>,
}

/// Fetch merged and open PRs concurrently.
///
/// A failed merged fetch fails the run. A failed open fetch is logged and the
/// snapshot carries an empty open population, so merged-PR analysis still runs.
pub async fn fetch_snapshot(
    client: &Octocrab,
    repo: &RepoSlug,
    merged: &FetchOptions,
    open: &FetchOptions,
) -> Result<Snapshot> {
    let (merged_result, open_result) = tokio::join!(
        fetch_pull_requests(client, repo, PrState::Merged, merged),
        fetch_pull_requests(client, repo, PrState::Open, open),
    );
    combine(merged_result, open_result)
}

fn combine(
    merged: Result<Vec<PullRequest>>,
    open: Result<Vec<PullRequest>>,
) -> Result<Snapshot> {
    let merged = merged.context("Failed to fetch merged PRs")?;
    let open = match open {
        Ok(prs) => prs,
        Err(e) => {
            log::warn!("Failed to fetch open PRs, skipping risk analysis: {:#}", e);
            Vec::new()
        }
    };

    log::debug!("Fetched {} merged and {} open PRs", merged.len(), open.len());

    Ok(Snapshot { merged, open })
}
