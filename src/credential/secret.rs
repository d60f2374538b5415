use super::provider::{CredentialError, CredentialProvider};

/// Message surfaced when no key is configured server-side
pub const NOT_CONFIGURED: &str = "API key is not configured on the server environment.";

/// Where the API key lives on the server
#[derive(Debug, Clone)]
pub enum SecretSource {
    /// Read from an environment variable on every request
    Env(String),
    /// Fixed value resolved at startup (or absent)
    Fixed(Option<String>),
}

impl SecretSource {
    /// Resolve the key
    ///
    /// The value is returned as configured; it only has to be non-empty
    /// after trimming whitespace.
    pub fn resolve(&self) -> Result<String, CredentialError> {
        let value = match self {
            SecretSource::Env(var) => std::env::var(var).ok(),
            SecretSource::Fixed(value) => value.clone(),
        };

        match value {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(CredentialError::NotConfigured(NOT_CONFIGURED.to_string())),
        }
    }
}

/// Local secret used directly by the client, bypassing the HTTP endpoint
#[async_trait::async_trait]
impl CredentialProvider for SecretSource {
    async fn fetch(&self) -> Result<String, CredentialError> {
        self.resolve()
    }

    fn name(&self) -> &str {
        match self {
            SecretSource::Env(_) => "env",
            SecretSource::Fixed(_) => "fixed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_key_resolves_untrimmed() {
        let source = SecretSource::Fixed(Some(" abc ".to_string()));
        assert_eq!(source.resolve().unwrap(), " abc ");
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        for value in [None, Some(String::new()), Some("  \t\n".to_string())] {
            let err = SecretSource::Fixed(value).resolve().unwrap_err();
            assert_eq!(err.to_string(), NOT_CONFIGURED);
        }
    }

    #[test]
    fn test_missing_env_var_is_not_configured() {
        let source = SecretSource::Env("STYLECAM_TEST_SURELY_UNSET_KEY".to_string());
        assert!(matches!(
            source.resolve(),
            Err(CredentialError::NotConfigured(_))
        ));
    }
}
