use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use super::ConfigError;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Parent directory that holds the movie folders.
    #[serde(default)]
    pub movie_path: PathBuf,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Output resolutions the transcoder may prepare.
    #[serde(default = "default_resolutions")]
    pub resolutions: Vec<Resolution>,
    #[serde(default)]
    pub ffmpeg: FfmpegConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            movie_path: PathBuf::new(),
            server: ServerConfig::default(),
            tmdb: TmdbConfig::default(),
            resolutions: default_resolutions(),
            ffmpeg: FfmpegConfig::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    1818
}

/// TMDB metadata provider configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB API key, see https://www.themoviedb.org/documentation/api
    #[serde(default)]
    pub api_key: String,
}

/// Transcoder binary configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FfmpegConfig {
    /// Absolute path, or a bare name looked up on `PATH`.
    #[serde(default = "default_ffmpeg_path")]
    pub path: PathBuf,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            path: default_ffmpeg_path(),
        }
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_resolutions() -> Vec<Resolution> {
    Resolution::STANDARD.to_vec()
}

/// Output resolution served to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Resolution {
    #[serde(rename = "360p")]
    P360,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
}

impl Resolution {
    /// Set used when no resolution is requested.
    pub const STANDARD: [Resolution; 4] = [
        Resolution::P360,
        Resolution::P480,
        Resolution::P720,
        Resolution::P1080,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::P360 => "360p",
            Self::P480 => "480p",
            Self::P720 => "720p",
            Self::P1080 => "1080p",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Resolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::STANDARD
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::InvalidResolution(s.to_string()))
    }
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub movie_path: PathBuf,
    pub server: ServerConfig,
    pub tmdb: SanitizedTmdbConfig,
    pub resolutions: Vec<Resolution>,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            movie_path: config.movie_path.clone(),
            server: config.server.clone(),
            tmdb: SanitizedTmdbConfig {
                api_key_configured: !config.tmdb.api_key.trim().is_empty(),
            },
            resolutions: config.resolutions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
movie_path = "/srv/movies"
resolutions = ["720p", "1080p"]

[server]
host = "127.0.0.1"
port = 9000

[tmdb]
api_key = "abc"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.movie_path, PathBuf::from("/srv/movies"));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.tmdb.api_key, "abc");
        assert_eq!(config.resolutions, vec![Resolution::P720, Resolution::P1080]);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 1818);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.resolutions, Resolution::STANDARD.to_vec());
        assert_eq!(config.ffmpeg.path, PathBuf::from("ffmpeg"));
        assert!(config.tmdb.api_key.is_empty());
    }

    #[test]
    fn test_unknown_resolution_fails() {
        let result: Result<Config, _> = toml::from_str(r#"resolutions = ["4k"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolution_from_str() {
        assert_eq!("720p".parse::<Resolution>().unwrap(), Resolution::P720);
        assert_eq!("1080P".parse::<Resolution>().unwrap(), Resolution::P1080);
        assert!(matches!(
            "2160p".parse::<Resolution>(),
            Err(ConfigError::InvalidResolution(_))
        ));
    }

    #[test]
    fn test_sanitized_config_hides_key() {
        let mut config = Config::default();
        config.tmdb.api_key = "secret-key".to_string();

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.tmdb.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
    }
}
