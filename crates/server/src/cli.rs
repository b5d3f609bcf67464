use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use voodio_core::{ConfigOverrides, Resolution};

/// Serve a local movie library over HTTP.
#[derive(Debug, Parser)]
#[command(name = "voodio", version, about)]
pub struct Cli {
    /// Optional TOML config file
    #[arg(long, env = "VOODIO_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Movie library root
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on [default: 1818]
    #[arg(long)]
    pub port: Option<u16>,

    /// TMDB API key
    #[arg(long = "tmdb-key", value_name = "KEY")]
    pub tmdb_key: Option<String>,

    /// Target resolution, repeatable (360p, 480p, 720p, 1080p)
    #[arg(long = "resolution", value_name = "RES")]
    pub resolutions: Vec<Resolution>,

    /// ffmpeg binary name or path
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            movie_path: self.path.clone(),
            host: self.host,
            port: self.port,
            tmdb_api_key: self.tmdb_key.clone(),
            resolutions: self.resolutions.clone(),
            ffmpeg_path: self.ffmpeg.clone(),
        }
    }
}
