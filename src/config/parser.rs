use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[http]
base-url = "https://job.mynavi.jp"
timeout-secs = 20

[search]
page-size = 50
max-pages = 4

[output]
results-dir = "./out"
save-snapshots = true

[[filter]]
category = "welfare"
codes = ["1830"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.http.base_url, "https://job.mynavi.jp");
        assert_eq!(config.http.timeout_secs, 20);
        assert_eq!(config.search.page_size, 50);
        assert_eq!(config.search.max_pages, 4);
        assert!(config.output.save_snapshots);
        assert_eq!(config.filters.len(), 1);
        assert_eq!(config.filters[0].codes, vec!["1830"]);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config_content = r#"
[http]
base-url = "https://job.mynavi.jp"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        // Untouched sections fall back to production defaults
        assert_eq!(config.search.page_size, 100);
        assert_eq!(config.search.max_pages, 10);
        assert_eq!(config.http.max_redirects, 5);
        assert_eq!(config.filters.len(), 1);
        assert_eq!(config.filters[0].category, "welfare");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[search]
max-pages = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_default_config_is_valid() {
        validate(&Config::default()).unwrap();
    }
}
