use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_LIMIT: usize = 100;
pub const DEFAULT_TIMEOUT: &str = "30s";
pub const DEFAULT_DELAY: &str = "200ms";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub fetch: FetchConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Merged PRs to fetch, newest first
    pub limit: usize,
    /// Open PRs to fetch, most recently updated first
    pub open_limit: usize,
    /// Per-request timeout, humantime format ("30s", "1m")
    pub timeout: String,
    /// Pause between pages
    pub delay: String,
    /// API root for GitHub Enterprise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            open_limit: DEFAULT_LIMIT,
            timeout: DEFAULT_TIMEOUT.to_string(),
            delay: DEFAULT_DELAY.to_string(),
            api_url: None,
        }
    }
}

impl FetchConfig {
    /// Parsed `timeout`; `None` when it is not a valid humantime duration
    pub fn timeout_duration(&self) -> Option<Duration> {
        humantime::parse_duration(&self.timeout).ok()
    }

    pub fn delay_duration(&self) -> Option<Duration> {
        humantime::parse_duration(&self.delay).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub exclude_outliers: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "fetch:\n  limit: 250\n";
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.fetch.limit, 250);
        assert_eq!(config.fetch.open_limit, DEFAULT_LIMIT);
        assert_eq!(config.fetch.timeout_duration(), Some(Duration::from_secs(30)));
        assert_eq!(config.fetch.delay_duration(), Some(Duration::from_millis(200)));
        assert!(!config.analysis.exclude_outliers);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
fetch:
  limit: 50
  open_limit: 20
  timeout: "1m"
  delay: "0s"
  api_url: "https://ghe.example.com/api"
analysis:
  exclude_outliers: true
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.fetch.open_limit, 20);
        assert_eq!(config.fetch.timeout_duration(), Some(Duration::from_secs(60)));
        assert_eq!(config.fetch.delay_duration(), Some(Duration::ZERO));
        assert_eq!(
            config.fetch.api_url.as_deref(),
            Some("https://ghe.example.com/api")
        );
        assert!(config.analysis.exclude_outliers);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "fetch:\n  limt: 10\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }
}
