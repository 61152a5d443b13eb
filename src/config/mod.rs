// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Prefix for all other environment overrides, e.g. `GEMSIGHT_SERVER__PORT`.
pub const ENV_PREFIX: &str = "GEMSIGHT";

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. `GOOGLE_API_KEY` for the credential
    /// 2. Environment variables (`GEMSIGHT_*`)
    /// 3. Config file (`path`, or `~/.gemsight/config.toml`)
    /// 4. Defaults (lowest)
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // Missing .env is normal
        let _ = dotenvy::dotenv();
        Self::load_with_env(path, None)
    }

    /// Same as [`AppConfig::load`] but reads environment variables from
    /// `vars` instead of the process when given.
    pub fn load_with_env(
        path: Option<&Path>,
        vars: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let api_key = match &vars {
            Some(vars) => vars.get(API_KEY_ENV).cloned(),
            None => std::env::var(API_KEY_ENV).ok(),
        }
        .filter(|key| !key.trim().is_empty());

        let (file_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_config_path(), false),
        };

        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(
                File::from(file_path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(vars),
            )
            .set_override_option("gemini.api_key", api_key)?
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Startup checks that depend on the validation switches.
    pub fn validate(&self) -> Result<()> {
        if self.validation.require_api_key && self.gemini.api_key.is_none() {
            return Err(AppError::Config(format!(
                "{} is not set and validation.require_api_key is enabled",
                API_KEY_ENV
            )));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(AppError::Config("gemini.model must not be empty".to_string()));
        }
        Ok(())
    }

    /// Whether a credential was found. The key itself is never exposed here.
    pub fn has_api_key(&self) -> bool {
        self.gemini.api_key.is_some()
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gemsight")
            .join("config.toml")
    }
}
