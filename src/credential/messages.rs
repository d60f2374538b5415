use serde::{Deserialize, Serialize};

/// Successful body of `GET /api/get-key`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyResponse {
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

/// Error body returned by the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Lenient view of a credential response as seen by the client
///
/// Either field may be absent; the client decides what that means.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CredentialBody {
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
    pub error: Option<String>,
}
