pub mod client;
pub mod fetch;
pub mod repo;
pub mod types;

pub use client::create_client;
pub use fetch::{fetch_pull_requests, FetchOptions, PrState};
pub use repo::RepoSlug;
pub use types::PullRequest;
