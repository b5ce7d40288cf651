//! Configuration model loaded from external sources.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use jsonwebtoken::Algorithm;
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read settings: {0}")]
    Source(#[from] ConfigError),
    #[error("invalid settings: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

#[derive(Clone, Debug, Deserialize, Validate)]
/// Settings of the Auth0 tenant that signs access tokens for the API.
pub struct Auth0ServerConfig {
    /// Tenant host, e.g. `dev-0yekb24q.us.auth0.com`.
    #[validate(length(min = 1))]
    pub domain: String,
    #[validate(length(min = 1))]
    pub audience: String,
    #[serde(default = "default_algorithms")]
    #[validate(length(min = 1))]
    pub algorithms: Vec<Algorithm>,
    #[serde(default = "default_jwks_cache_ttl_secs")]
    pub jwks_cache_ttl_secs: u64,
    /// Shortest gap between two forced JWKS refetches (unknown `kid`).
    #[serde(default = "default_jwks_min_refresh_secs")]
    pub jwks_min_refresh_secs: u64,
    #[serde(default)]
    pub leeway_secs: u64,
}

impl Auth0ServerConfig {
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    pub fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.domain)
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[validate(nested)]
    pub auth0: Auth0ServerConfig,
}

impl ServerConfig {
    /// Layer `default.yaml`, the optional `{app_env}.yaml` and `APP_*`
    /// variables (nested keys separated by `__`).
    pub fn load(config_dir: &Path, app_env: &str) -> Result<Self, ConfigLoadError> {
        Self::load_with(config_dir, app_env, env_overrides())
    }

    fn load_with(
        config_dir: &Path,
        app_env: &str,
        overrides: Environment,
    ) -> Result<Self, ConfigLoadError> {
        let settings = Config::builder()
            .add_source(File::with_name(&config_dir.join("default").to_string_lossy()))
            .add_source(
                File::with_name(&config_dir.join(app_env).to_string_lossy()).required(false),
            )
            .add_source(overrides)
            .build()?;

        let server_config = settings.try_deserialize::<ServerConfig>()?;
        server_config.validate()?;
        Ok(server_config)
    }
}

fn env_overrides() -> Environment {
    Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("allowed_origins")
        .try_parsing(true)
}

fn default_algorithms() -> Vec<Algorithm> {
    vec![Algorithm::RS256]
}

fn default_jwks_cache_ttl_secs() -> u64 {
    3600
}

fn default_jwks_min_refresh_secs() -> u64 {
    30
}
