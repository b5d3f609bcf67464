use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError, Resolution};

/// Values supplied on the command line; they win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub movie_path: Option<PathBuf>,
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub tmdb_api_key: Option<String>,
    pub resolutions: Vec<Resolution>,
    pub ffmpeg_path: Option<PathBuf>,
}

/// Load configuration: defaults, then the optional TOML file, then
/// `VOODIO_` environment variables, then command-line overrides.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("VOODIO_").split("__"));

    if let Some(movie_path) = &overrides.movie_path {
        figment = figment.merge(Serialized::default("movie_path", movie_path));
    }
    if let Some(host) = overrides.host {
        figment = figment.merge(Serialized::default("server.host", host));
    }
    if let Some(port) = overrides.port {
        figment = figment.merge(Serialized::default("server.port", port));
    }
    if let Some(key) = &overrides.tmdb_api_key {
        figment = figment.merge(Serialized::default("tmdb.api_key", key));
    }
    if !overrides.resolutions.is_empty() {
        figment = figment.merge(Serialized::default("resolutions", &overrides.resolutions));
    }
    if let Some(ffmpeg_path) = &overrides.ffmpeg_path {
        figment = figment.merge(Serialized::default("ffmpeg.path", ffmpeg_path));
    }

    let config: Config = figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(with_default_resolutions(config))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str)
        .map(with_default_resolutions)
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn with_default_resolutions(mut config: Config) -> Config {
    if config.resolutions.is_empty() {
        config.resolutions = Resolution::STANDARD.to_vec();
    }
    config.resolutions.sort();
    config.resolutions.dedup();
    config
}
