use crate::config::types::{Config, FilterEntry, HttpConfig, OutputConfig, SearchConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_search_config(&config.search)?;
    validate_output_config(&config.output)?;
    validate_filters(&config.filters)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must be http(s), got '{}'",
            config.base_url
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be <= 20, got {}",
            config.max_redirects
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates search configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.form_selector.is_empty() {
        return Err(ConfigError::Validation(
            "form-selector cannot be empty".to_string(),
        ));
    }

    if config.page_size < 1 || config.page_size > 500 {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and 500, got {}",
            config.page_size
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.delay_min_secs < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay-min-secs must be >= 0, got {}",
            config.delay_min_secs
        )));
    }

    if config.delay_max_secs < config.delay_min_secs {
        return Err(ConfigError::Validation(format!(
            "delay-max-secs ({}) must be >= delay-min-secs ({})",
            config.delay_max_secs, config.delay_min_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_dir.is_empty() {
        return Err(ConfigError::Validation(
            "results-dir cannot be empty".to_string(),
        ));
    }

    if config.snapshot_dir.is_empty() {
        return Err(ConfigError::Validation(
            "snapshot-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates filter entries
fn validate_filters(filters: &[FilterEntry]) -> Result<(), ConfigError> {
    for entry in filters {
        if entry.category.is_empty() {
            return Err(ConfigError::Validation(
                "filter category cannot be empty".to_string(),
            ));
        }

        if entry.codes.is_empty() {
            return Err(ConfigError::Validation(format!(
                "filter '{}' must have at least one code",
                entry.category
            )));
        }

        for code in &entry.codes {
            if code.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "filter '{}' contains an empty code",
                    entry.category
                )));
            }
        }
    }

    Ok(())
}
