// CLI module for gemsight
// Author: kelexine (https://github.com/kelexine)

use crate::config::AppConfig;
use clap::Parser;
use std::path::PathBuf;

/// gemsight - Extract text from images with a Gemini multimodal model
#[derive(Parser, Debug)]
#[command(name = "gemsight", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.gemsight/config.toml if present)
    #[arg(long, env = "GEMSIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub check_config: bool,
}

impl Args {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
