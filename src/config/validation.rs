use crate::config::types::{CatalogConfig, Config, ScraperConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_catalog_config(&config.catalog)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.request_timeout_secs
    {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be between 1 and request_timeout_secs ({}), got {}",
            config.request_timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 64 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 64, got {}",
            config.max_concurrent_fetches
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate agent name: non-empty, alphanumeric + hyphens only
    if config.agent_name.is_empty() {
        return Err(ConfigError::Validation(
            "agent_name cannot be empty".to_string(),
        ));
    }

    if !config
        .agent_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "agent_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.agent_name
        )));
    }

    if config.agent_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "agent_version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates catalog repository configuration
fn validate_catalog_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    validate_repository(&config.repository)?;

    if config.base_branch.trim().is_empty() {
        return Err(ConfigError::Validation(
            "base_branch cannot be empty".to_string(),
        ));
    }

    if config.data_dir.starts_with('/') || config.data_dir.split('/').any(|s| s == "..") {
        return Err(ConfigError::Validation(format!(
            "data_dir must be a relative path inside the repository, got '{}'",
            config.data_dir
        )));
    }

    for (key, value) in [("api_url", &config.api_url), ("web_url", &config.web_url)] {
        let url = Url::parse(value)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", key, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "{} must use http or https, got '{}'",
                key, value
            )));
        }
    }

    Ok(())
}

/// Validates an `owner/name` repository identifier
fn validate_repository(repository: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = repository.split('/').collect();
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::Validation(format!(
            "repository must be in 'owner/name' form, got '{}'",
            repository
        )));
    }

    if !parts
        .iter()
        .all(|p| p.chars().all(|c| c.is_alphanumeric() || "-_.".contains(c)))
    {
        return Err(ConfigError::Validation(format!(
            "repository '{}' contains invalid characters",
            repository
        )));
    }

    Ok(())
}
