use crate::capture::CaptureError;
use crate::credential::CredentialError;
use crate::remote::ConnectError;
use thiserror::Error;

/// Terminal session failure, one variant per bootstrap stage
///
/// The display form is the triggering error's message, unadorned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    CredentialUnavailable(String),

    #[error("{0}")]
    CaptureDenied(String),

    #[error("{0}")]
    ConnectFailed(String),
}

impl From<CredentialError> for SessionError {
    fn from(e: CredentialError) -> Self {
        SessionError::CredentialUnavailable(e.to_string())
    }
}

impl From<CaptureError> for SessionError {
    fn from(e: CaptureError) -> Self {
        SessionError::CaptureDenied(e.to_string())
    }
}

impl From<ConnectError> for SessionError {
    fn from(e: ConnectError) -> Self {
        SessionError::ConnectFailed(e.to_string())
    }
}
