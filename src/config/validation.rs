use crate::config::types::{Config, CrawlerConfig, OutputConfig, SourceConfig, PAGE_PLACEHOLDER};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_source_config(&config.source)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // page_count == 0 is allowed: the run writes the header and nothing else

    if config.worker_count < 1 || config.worker_count > 100 {
        return Err(ConfigError::Validation(format!(
            "worker_count must be between 1 and 100, got {}",
            config.worker_count
        )));
    }

    if config.fetch_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "fetch_timeout must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

/// Validates the page source
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let placeholders = config.url_template.matches(PAGE_PLACEHOLDER).count();
    if placeholders != 1 {
        return Err(ConfigError::InvalidTemplate(format!(
            "'{}' must contain exactly one '{}' placeholder, found {}",
            config.url_template, PAGE_PLACEHOLDER, placeholders
        )));
    }

    let sample = config.url_template.replacen(PAGE_PLACEHOLDER, "1", 1);
    let url = Url::parse(&sample).map_err(|e| {
        ConfigError::InvalidTemplate(format!("'{}' is not a valid URL: {}", config.url_template, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidTemplate(format!(
            "'{}' must use http or https",
            config.url_template
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    if config.header.len() != 3 {
        return Err(ConfigError::Validation(format!(
            "header must have 3 columns (quote, author, tags), got {}",
            config.header.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_worker_count() {
        let mut config = Config::default();
        config.crawler.worker_count = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));

        config.crawler.worker_count = 101;
        assert!(validate(&config).is_err());

        config.crawler.worker_count = 100;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_pages_is_valid() {
        let mut config = Config::default();
        config.crawler.page_count = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.crawler.fetch_timeout = Duration::ZERO;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_url_template() {
        let mut config = Config::default();

        config.source.url_template = "http://example.com/page/".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidTemplate(_))
        ));

        config.source.url_template = "http://example.com/{}/{}".to_string();
        assert!(validate(&config).is_err());

        config.source.url_template = "ftp://example.com/{}".to_string();
        assert!(validate(&config).is_err());

        config.source.url_template = "not a url {}".to_string();
        assert!(validate(&config).is_err());

        config.source.url_template = "https://example.com/page/{}/".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_output() {
        let mut config = Config::default();
        config.output.path = PathBuf::new();
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.output.header.pop();
        assert!(validate(&config).is_err());
    }
}
