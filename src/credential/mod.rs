//! API key plumbing
//!
//! - `secret`: server-side resolution of the key from the environment
//! - `provider`: client-side retrieval (HTTP endpoint or local secret)
//! - `messages`: JSON bodies shared by the endpoint and its client

pub mod messages;
pub mod provider;
pub mod secret;

pub use messages::{ApiKeyResponse, ErrorResponse};
pub use provider::{CredentialError, CredentialProvider, HttpCredentialProvider};
pub use secret::SecretSource;
