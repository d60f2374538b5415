use crate::credential::SecretSource;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Where the served API key comes from
    pub secret: Arc<SecretSource>,
}

impl AppState {
    pub fn new(secret: SecretSource) -> Self {
        Self {
            secret: Arc::new(secret),
        }
    }
}
