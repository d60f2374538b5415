use crate::capture::SyntheticCameraConfig;
use crate::credential::SecretSource;
use crate::profile::{ModelProfile, DEFAULT_MODEL};
use crate::session::{SessionConfig, DEFAULT_PROMPT};
use anyhow::{Context, Result};
use serde::Deserialize;

/// Prefix for environment overrides, e.g. `STYLECAM__SERVICE__HTTP__PORT`
const ENV_PREFIX: &str = "STYLECAM";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub credential: CredentialConfig,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub capture: SyntheticCameraConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct CredentialConfig {
    /// Environment variable holding the API key on the server
    pub api_key_env: String,
    /// Endpoint the client fetches the key from; when unset the client
    /// reads `api_key_env` directly
    pub endpoint: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    pub model: String,
    pub initial_prompt: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            initial_prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl Config {
    /// Load `path` (any format the `config` crate recognises by extension),
    /// then apply `STYLECAM__*` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("Failed to read config {}", path))?;

        Ok(settings.try_deserialize()?)
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.service.http.bind, self.service.http.port)
    }

    pub fn secret_source(&self) -> SecretSource {
        SecretSource::Env(self.credential.api_key_env.clone())
    }

    /// Resolve the session settings against the known model profiles
    pub fn session_config(&self) -> Result<SessionConfig> {
        let profile = ModelProfile::realtime(&self.session.model)?;
        Ok(SessionConfig {
            profile,
            initial_prompt: self.session.initial_prompt.clone(),
        })
    }
}
