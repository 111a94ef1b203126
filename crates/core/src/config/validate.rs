use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Engine path is not empty
/// - Worker limits are at least 1
/// - Watch interval is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.engine.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "engine.path cannot be empty".to_string(),
        ));
    }

    if config.workers.cpu == 0 {
        return Err(ConfigError::ValidationError(
            "workers.cpu cannot be 0".to_string(),
        ));
    }

    if config.workers.gpu == 0 {
        return Err(ConfigError::ValidationError(
            "workers.gpu cannot be 0".to_string(),
        ));
    }

    if config.watch.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "watch.interval_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
