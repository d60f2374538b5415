use super::messages::CredentialBody;
use thiserror::Error;
use tracing::{info, warn};

/// Why an API key could not be obtained
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No key configured where one was expected
    #[error("{0}")]
    NotConfigured(String),

    /// Endpoint answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Endpoint answered 200 without a usable key
    #[error("API key missing from credential response")]
    MissingKey,

    /// Request could not be completed
    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

/// Source of the API key handed to the remote sink
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Fetch the key. Called once per session bootstrap.
    async fn fetch(&self) -> Result<String, CredentialError>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Fetches the key from the `GET /api/get-key` endpoint
pub struct HttpCredentialProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpCredentialProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl CredentialProvider for HttpCredentialProvider {
    async fn fetch(&self) -> Result<String, CredentialError> {
        info!("Fetching API key from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // A non-JSON body is only fatal on the success path
        let body: CredentialBody = serde_json::from_slice(&bytes).unwrap_or_default();

        if !status.is_success() {
            let message = body
                .error
                .unwrap_or_else(|| format!("Credential endpoint returned HTTP {}", status.as_u16()));
            warn!("Credential endpoint rejected request ({}): {}", status, message);
            return Err(CredentialError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        match body.api_key {
            Some(key) if !key.is_empty() => Ok(key),
            _ => {
                warn!("Credential endpoint returned {} without an API key", status);
                Err(CredentialError::MissingKey)
            }
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
