use crate::config::types::{Config, CrawlConfig, HttpConfig};
use crate::ConfigError;

/// Upper bound for any single request (ten minutes)
const MAX_REQUEST_TIMEOUT_MS: u64 = 600_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_crawl_config(&config.crawl)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    // Header values must be visible ASCII or spaces
    if !config
        .user_agent
        .chars()
        .all(|c| c == ' ' || c.is_ascii_graphic())
    {
        return Err(ConfigError::Validation(format!(
            "user-agent must be printable ASCII, got '{}'",
            config.user_agent
        )));
    }

    if config.request_timeout_ms == 0 || config.request_timeout_ms > MAX_REQUEST_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "request-timeout-ms must be between 1 and {}, got {}",
            MAX_REQUEST_TIMEOUT_MS, config.request_timeout_ms
        )));
    }

    if config.connect_timeout_ms == 0 || config.connect_timeout_ms > config.request_timeout_ms {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-ms must be between 1 and request-timeout-ms ({}), got {}",
            config.request_timeout_ms, config.connect_timeout_ms
        )));
    }

    Ok(())
}

/// Validates crawl run configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.deadline_secs == Some(0) {
        return Err(ConfigError::Validation(
            "deadline-secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "   ".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_user_agent_with_control_characters() {
        let mut config = Config::default();
        config.http.user_agent = "bad\nagent".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_request_timeout_bounds() {
        let mut config = Config::default();
        config.http.request_timeout_ms = 0;
        assert!(validate(&config).is_err());

        config.http.request_timeout_ms = MAX_REQUEST_TIMEOUT_MS + 1;
        assert!(validate(&config).is_err());

        config.http.request_timeout_ms = MAX_REQUEST_TIMEOUT_MS;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_connect_timeout_not_above_request_timeout() {
        let mut config = Config::default();
        config.http.request_timeout_ms = 1_000;
        config.http.connect_timeout_ms = 2_000;
        assert!(validate(&config).is_err());

        config.http.connect_timeout_ms = 1_000;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_deadline() {
        let mut config = Config::default();
        config.crawl.deadline_secs = Some(0);
        assert!(validate(&config).is_err());

        config.crawl.deadline_secs = Some(1);
        assert!(validate(&config).is_ok());
    }
}
