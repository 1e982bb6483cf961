use crate::config::types::{Config, CrawlerConfig, OutputConfig, ScreenshotConfig, UserAgentConfig};
use crate::url::canonicalize_seed;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_screenshot_config(&config.screenshots)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    canonicalize_seed(&config.seed_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.seed_url, e))
    })?;

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 32 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 32, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "fetch_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_run_secs == Some(0) {
        return Err(ConfigError::Validation(
            "max_run_secs must be >= 1 when set".to_string(),
        ));
    }

    for ext in &config.denied_extensions {
        validate_extension(ext)?;
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.projects_dir.is_empty() {
        return Err(ConfigError::Validation(
            "projects_dir cannot be empty".to_string(),
        ));
    }

    validate_project_name(&config.project_name)
}

/// Validates a project name: it must yield a non-empty directory slug
pub fn validate_project_name(name: &str) -> Result<(), ConfigError> {
    if !name.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "project_name must contain at least one letter or digit, got '{}'",
            name
        )));
    }
    Ok(())
}

/// Validates screenshot configuration
fn validate_screenshot_config(config: &ScreenshotConfig) -> Result<(), ConfigError> {
    if config.viewport_width < 100 || config.viewport_height < 100 {
        return Err(ConfigError::Validation(format!(
            "viewport must be at least 100x100, got {}x{}",
            config.viewport_width, config.viewport_height
        )));
    }

    if config.capture_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "capture_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates one denied extension entry
fn validate_extension(ext: &str) -> Result<(), ConfigError> {
    if ext.is_empty() {
        return Err(ConfigError::Validation(
            "denied extension cannot be empty".to_string(),
        ));
    }

    if ext.contains('.') || ext.contains('/') {
        return Err(ConfigError::Validation(format!(
            "denied extension '{}' must not contain '.' or '/'",
            ext
        )));
    }

    Ok(())
}
