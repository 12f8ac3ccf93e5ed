use anyhow::{bail, Context, Result};
use std::io::IsTerminal;

/// Tool-specific variable, checked first
pub const ENV_TOKEN_VAR: &str = "PR_PULSE_GH_TOKEN";

/// Conventional variable set by CI and the gh CLI
pub const FALLBACK_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// First non-empty token among the known environment variables.
///
/// `lookup` is `std::env::var` in production; tests inject their own.
pub fn token_from_env_with<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    [ENV_TOKEN_VAR, FALLBACK_TOKEN_VAR]
        .into_iter()
        .filter_map(|name| lookup(name))
        .map(|val| val.trim().to_string())
        .find(|val| !val.is_empty())
}

pub fn get_token_from_env() -> Option<String> {
    token_from_env_with(|name| std::env::var(name).ok())
}

/// Prompts user to enter GitHub personal access token
pub fn prompt_for_token() -> Result<String> {
    eprintln!("GitHub personal access token required.");
    eprintln!("Create one at: https://github.com/settings/tokens");
    eprintln!("Required scopes: repo (for private repos) or public_repo (for public only)");
    eprintln!("Set {} to skip this prompt.", ENV_TOKEN_VAR);
    eprintln!();

    let token = rpassword::prompt_password("Enter token: ")
        .context("Failed to read token from terminal")?;

    let token = token.trim();
    if token.is_empty() {
        bail!("Token cannot be empty");
    }

    Ok(token.to_string())
}

/// Token from the environment, or an interactive prompt when attached to a
/// terminal. The token is never written anywhere.
pub fn resolve_token() -> Result<String> {
    if let Some(token) = get_token_from_env() {
        log::debug!("Using GitHub token from environment");
        return Ok(token);
    }

    if !std::io::stdin().is_terminal() {
        bail!(
            "No GitHub token found. Set {} or {}.",
            ENV_TOKEN_VAR,
            FALLBACK_TOKEN_VAR
        );
    }

    prompt_for_token()
}
