use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use crate::github::repo::RepoSlug;
use crate::github::types::PullRequest;

/// GitHub caps connection pages at 100 nodes.
pub const MAX_PAGE_SIZE: usize = 100;

/// Which population to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrState {
    Merged,
    Open,
}

impl PrState {
    fn graphql_state(self) -> &'static str {
        match self {
            PrState::Merged => "MERGED",
            PrState::Open => "OPEN",
        }
    }

    /// Newest merges first; for open PRs, recently touched first so the
    /// backlog that matters most fits in the limit.
    fn order_field(self) -> &'static str {
        match self {
            PrState::Merged => "CREATED_AT",
            PrState::Open => "UPDATED_AT",
        }
    }
}

/// Pacing and limits for one population fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub limit: usize,
    /// Per-request timeout
    pub timeout: Duration,
    /// Pause between pages
    pub delay: Duration,
}

const PULL_REQUESTS_QUERY: &str = r#"
query($owner: String!, $name: String!, $first: Int!, $states: [PullRequestState!], $orderField: IssueOrderField!, $after: String) {
  repository(owner: $owner, name: $name) {
    pullRequests(first: $first, states: $states, orderBy: {field: $orderField, direction: DESC}, after: $after) {
      nodes {
        number
        title
        createdAt
        updatedAt
        mergedAt
        additions
        deletions
        author { login }
        reviews(first: 10) {
          nodes {
            createdAt
            author { login }
          }
        }
        reviewRequests(first: 10) {
          nodes {
            requestedReviewer {
              ... on User { login }
            }
          }
        }
        files(first: 5) {
          nodes { path }
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    pull_requests: Connection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection {
    #[serde(default)]
    nodes: Vec<Option<PrNode>>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Nodes<T> {
    #[serde(default)]
    nodes: Vec<Option<T>>,
}

impl<T> Nodes<T> {
    fn into_items(self) -> impl Iterator<Item = T> {
        self.nodes.into_iter().flatten()
    }
}

#[derive(Debug, Deserialize)]
struct Actor {
    login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrNode {
    number: u64,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    author: Option<Actor>, // null for deleted accounts
    reviews: Option<Nodes<ReviewNode>>,
    review_requests: Option<Nodes<ReviewRequestNode>>,
    files: Option<Nodes<FileNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewNode {
    created_at: DateTime<Utc>,
    author: Option<Actor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRequestNode {
    requested_reviewer: Option<RequestedReviewer>,
}

/// Teams come back as an empty object since the query only spreads `User`.
#[derive(Debug, Deserialize)]
struct RequestedReviewer {
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileNode {
    path: String,
}

impl PrNode {
    fn into_pull_request(self) -> PullRequest {
        let author = self.author.map(|a| a.login).unwrap_or_default();

        let mut first_review_at: Option<DateTime<Utc>> = None;
        let mut reviewers = BTreeSet::new();
        for review in self.reviews.into_iter().flat_map(Nodes::into_items) {
            first_review_at = Some(match first_review_at {
                Some(earliest) => earliest.min(review.created_at),
                None => review.created_at,
            });
            if let Some(login) = review.author.map(|a| a.login) {
                if !login.is_empty() && login != author {
                    reviewers.insert(login);
                }
            }
        }

        let requested_reviewers = self
            .review_requests
            .into_iter()
            .flat_map(Nodes::into_items)
            .filter_map(|req| req.requested_reviewer.and_then(|r| r.login))
            .filter(|login| !login.is_empty())
            .collect();

        let file_paths = self
            .files
            .into_iter()
            .flat_map(Nodes::into_items)
            .map(|f| f.path)
            .collect();

        PullRequest {
            number: self.number,
            title: self.title,
            author,
            created_at: self.created_at,
            updated_at: self.updated_at,
            merged_at: self.merged_at,
            first_review_at,
            additions: self.additions,
            deletions: self.deletions,
            file_paths,
            reviewers,
            requested_reviewers,
        }
    }
}

impl GraphQlResponse {
    fn into_connection(self, repo: &RepoSlug) -> Result<Connection> {
        if let Some(first) = self.errors.first() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            if first.message.contains("Could not resolve to a Repository") {
                bail!(
                    "Repository {} not found or no access. Check the name and token permissions.",
                    repo
                );
            }
            bail!("GitHub GraphQL error: {}", messages.join("; "));
        }

        self.data
            .and_then(|d| d.repository)
            .map(|r| r.pull_requests)
            .ok_or_else(|| anyhow!("Repository {} not found in GitHub response", repo))
    }
}

/// Turn an octocrab failure into something a user can act on.
fn describe_api_error(e: octocrab::Error) -> anyhow::Error {
    let error_str = format!("{:?}", e);
    if error_str.contains("401") || error_str.contains("Bad credentials") {
        anyhow!("Authentication failed. Your GitHub token may be invalid or expired.")
    } else if error_str.contains("rate limit") || error_str.contains("403") {
        anyhow!("GitHub API rate limit exceeded. Wait a few minutes and try again.")
    } else {
        anyhow!("GitHub API error: {}", e)
    }
}

/// One GraphQL round trip with a timeout, retried with exponential backoff.
async fn run_query(
    client: &Octocrab,
    payload: &serde_json::Value,
    timeout: Duration,
) -> Result<GraphQlResponse> {
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .take(3);

    Retry::spawn(retry_strategy, || async {
        match tokio::time::timeout(timeout, client.graphql::<GraphQlResponse>(payload)).await {
            Ok(result) => result.map_err(describe_api_error),
            Err(_) => Err(anyhow!(
                "Request timed out after {}",
                humantime::format_duration(timeout)
            )),
        }
    })
    .await
}

/// Append one page to `prs`, keeping at most `limit` records.
///
/// Returns the cursor for the next page, or `None` once the limit is reached,
/// the page is empty or GitHub reports no further pages.
fn absorb_page(prs: &mut Vec<PullRequest>, connection: Connection, limit: usize) -> Option<String> {
    let before = prs.len();
    prs.extend(
        connection
            .nodes
            .into_iter()
            .flatten()
            .map(PrNode::into_pull_request),
    );
    prs.truncate(limit);

    let added = prs.len() - before;
    log::debug!("Fetched page of {} PRs ({} so far)", added, prs.len());

    if added == 0 || prs.len() >= limit || !connection.page_info.has_next_page {
        return None;
    }
    connection.page_info.end_cursor
}

/// Drive `fetch_page(cursor, page_size)` until `limit` records are collected
/// or the pages run out, sleeping `delay` between requests.
async fn paginate<F, Fut>(limit: usize, delay: Duration, mut fetch_page: F) -> Result<Vec<PullRequest>>
where
    F: FnMut(Option<String>, usize) -> Fut,
    Fut: Future<Output = Result<Connection>>,
{
    let mut prs: Vec<PullRequest> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut first = true;

    while prs.len() < limit {
        if !first {
            tokio::time::sleep(delay).await;
        }
        first = false;

        let page_size = (limit - prs.len()).min(MAX_PAGE_SIZE);
        let connection = fetch_page(cursor.take(), page_size).await?;
        match absorb_page(&mut prs, connection, limit) {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(prs)
}

/// Fetch up to `options.limit` pull requests in the given state, newest first.
///
/// Pages are requested one after another with `options.delay` between them
/// to stay clear of secondary rate limits.
pub async fn fetch_pull_requests(
    client: &Octocrab,
    repo: &RepoSlug,
    state: PrState,
    options: &FetchOptions,
) -> Result<Vec<PullRequest>> {
    let prs = paginate(options.limit, options.delay, move |cursor, page_size| {
        let payload = serde_json::json!({
            "query": PULL_REQUESTS_QUERY,
            "variables": {
                "owner": repo.owner,
                "name": repo.name,
                "first": page_size,
                "states": [state.graphql_state()],
                "orderField": state.order_field(),
                "after": cursor,
            }
        });
        async move {
            run_query(client, &payload, options.timeout)
                .await?
                .into_connection(repo)
        }
    })
    .await?;

    log::debug!("Fetched {} {:?} PRs for {}", prs.len(), state, repo);
    Ok(prs)
}
