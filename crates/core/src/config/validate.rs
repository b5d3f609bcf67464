use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - A movie directory was given
/// - A TMDB API key was given
/// - Server port is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.movie_path.as_os_str().is_empty()
        || config.movie_path.to_string_lossy().trim().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "no movie path directory provided".to_string(),
        ));
    }

    if config.tmdb.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "no TMDB API key provided".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    Ok(())
}
