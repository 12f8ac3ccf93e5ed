use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use pr_pulse::analytics::{analyze, AnalysisInput, AnalysisOptions};
use pr_pulse::config::{validate_config, Config};
use pr_pulse::github::{FetchOptions, RepoSlug};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_RATE_LIMIT: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_OUTPUT: i32 = 5;

#[derive(Parser, Debug)]
#[command(name = "pr-pulse")]
#[command(about = "Engineering velocity analytics for a GitHub repository's pull requests", long_about = None)]
#[command(version)]
struct Cli {
    /// Repository to analyze, as owner/repo
    repo: String,

    /// Drop the fastest and slowest 5% of merged PRs before analysis
    #[arg(long)]
    exclude_outliers: bool,

    /// Number of merged PRs to fetch (default 100)
    #[arg(long)]
    limit: Option<usize>,

    /// Number of open PRs to fetch (default 100)
    #[arg(long)]
    open_limit: Option<usize>,

    /// Per-request timeout, e.g. "30s" (default 30s)
    #[arg(long)]
    timeout: Option<String>,

    /// Pause between result pages, e.g. "200ms" (default 200ms)
    #[arg(long)]
    delay: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pr-pulse/config.yaml)
    #[arg(short, long)]
    config: Option<String>,
}

impl Cli {
    /// Layer command-line flags over file settings.
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(limit) = self.limit {
            config.fetch.limit = limit;
        }
        if let Some(open_limit) = self.open_limit {
            config.fetch.open_limit = open_limit;
        }
        if let Some(ref timeout) = self.timeout {
            config.fetch.timeout = timeout.clone();
        }
        if let Some(ref delay) = self.delay {
            config.fetch.delay = delay.clone();
        }
        if self.exclude_outliers {
            config.analysis.exclude_outliers = true;
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "pr_pulse=debug,warn" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Map a fetch failure to the matching exit code.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    let message = format!("{:#}", err);
    if message.contains("Authentication failed") {
        EXIT_AUTH
    } else if message.contains("rate limit") {
        EXIT_RATE_LIMIT
    } else {
        EXIT_NETWORK
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        log::debug!("rustls crypto provider already installed");
    }

    let start_time = Instant::now();

    let repo = match RepoSlug::parse(&cli.repo) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Load config
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let mut config = match pr_pulse::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    cli.apply_overrides(&mut config);

    if let Err(errors) = validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    // Validated above, so both parse
    let timeout = config.fetch.timeout_duration().unwrap_or_default();
    let delay = config.fetch.delay_duration().unwrap_or_default();
    let merged_options = FetchOptions {
        limit: config.fetch.limit,
        timeout,
        delay,
    };
    let open_options = FetchOptions {
        limit: config.fetch.open_limit,
        ..merged_options.clone()
    };

    let token = match pr_pulse::credentials::resolve_token() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Credential error: {:#}", e);
            std::process::exit(EXIT_AUTH);
        }
    };

    // Create GitHub client
    let client = match pr_pulse::github::create_client(&token, config.fetch.api_url.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create GitHub client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    log::debug!(
        "Fetching up to {} merged and {} open PRs for {}",
        merged_options.limit,
        open_options.limit,
        repo
    );

    let snapshot = match pr_pulse::fetch::fetch_snapshot(&client, &repo, &merged_options, &open_options).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(exit_code_for(&e));
        }
    };
    log::debug!("Fetch finished in {:?}", start_time.elapsed());

    let report = analyze(
        AnalysisInput {
            merged: &snapshot.merged,
            open: &snapshot.open,
            now: Utc::now(),
        },
        AnalysisOptions {
            exclude_outliers: config.analysis.exclude_outliers,
        },
    );

    if cli.json {
        match pr_pulse::output::format_json(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(EXIT_OUTPUT);
            }
        }
    } else {
        let use_colors = pr_pulse::output::should_use_colors();
        println!("{}", pr_pulse::output::format_report(&report, use_colors));
    }

    log::debug!("Total: {:?}", start_time.elapsed());

    std::process::exit(EXIT_SUCCESS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "pr-pulse",
            "owner/repo",
            "--limit",
            "500",
            "--delay",
            "1s",
            "--exclude-outliers",
        ]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.fetch.limit, 500);
        assert_eq!(config.fetch.open_limit, pr_pulse::config::DEFAULT_LIMIT);
        assert_eq!(config.fetch.delay, "1s");
        assert!(config.analysis.exclude_outliers);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::parse_from(["pr-pulse", "owner/repo"]);
        let mut config = Config::default();
        config.analysis.exclude_outliers = true;
        cli.apply_overrides(&mut config);
        assert!(config.analysis.exclude_outliers);
        assert_eq!(config.fetch.timeout, pr_pulse::config::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_exit_codes() {
        let auth = anyhow::anyhow!("Authentication failed. Your GitHub token may be invalid or expired.")
            .context("Failed to fetch merged PRs");
        assert_eq!(exit_code_for(&auth), EXIT_AUTH);

        let limited = anyhow::anyhow!("GitHub API rate limit exceeded. Wait a few minutes and try again.");
        assert_eq!(exit_code_for(&limited), EXIT_RATE_LIMIT);

        let other = anyhow::anyhow!("Request timed out after 30s");
        assert_eq!(exit_code_for(&other), EXIT_NETWORK);
    }
}
