use super::schema::Config;

/// Validate config values, collecting every problem rather than stopping at
/// the first one.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.fetch.limit == 0 {
        errors.push("fetch.limit: must be at least 1".to_string());
    }
    if config.fetch.open_limit == 0 {
        errors.push("fetch.open_limit: must be at least 1".to_string());
    }

    if let Err(e) = humantime::parse_duration(&config.fetch.timeout) {
        errors.push(format!(
            "fetch.timeout: invalid duration '{}' - {}",
            config.fetch.timeout, e
        ));
    } else if config.fetch.timeout_duration().is_some_and(|d| d.is_zero()) {
        errors.push("fetch.timeout: must be greater than zero".to_string());
    }

    if let Err(e) = humantime::parse_duration(&config.fetch.delay) {
        errors.push(format!(
            "fetch.delay: invalid duration '{}' - {}",
            config.fetch.delay, e
        ));
    }

    if let Some(ref url) = config.fetch.api_url {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            errors.push(format!(
                "fetch.api_url: '{}' must start with http:// or https://",
                url
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = Config::default();
        config.fetch.limit = 0;
        config.fetch.open_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("fetch.limit"));
        assert!(errors[1].starts_with("fetch.open_limit"));
    }

    #[test]
    fn test_bad_durations_rejected() {
        let mut config = Config::default();
        config.fetch.timeout = "soon".to_string();
        config.fetch.delay = "5 parsecs".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("fetch.timeout"));
        assert!(errors[1].contains("fetch.delay"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.fetch.timeout = "0s".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec!["fetch.timeout: must be greater than zero"]);
    }

    #[test]
    fn test_zero_delay_allowed() {
        let mut config = Config::default();
        config.fetch.delay = "0s".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_api_url_scheme() {
        let mut config = Config::default();
        config.fetch.api_url = Some("ghe.example.com/api".to_string());
        assert_eq!(validate_config(&config).unwrap_err().len(), 1);

        config.fetch.api_url = Some("https://ghe.example.com/api".to_string());
        assert!(validate_config(&config).is_ok());
    }
}
