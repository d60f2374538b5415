use crate::capture::MediaStream;
use crate::profile::ModelProfile;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Channel the sink pushes edited streams into
///
/// The sink may send any number of times; each stream replaces the previous
/// one for the receiver.
pub type EditedStreamSender = mpsc::UnboundedSender<MediaStream>;

/// Why a remote session could not be established
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Transport(String),
}

/// Remote real-time editing service
#[async_trait::async_trait]
pub trait RemoteSink: Send + Sync {
    /// Establish a session that edits `local` according to `profile`
    ///
    /// Edited streams are delivered on `on_remote`, possibly before this
    /// call resolves. Dropping the returned future must abandon the
    /// handshake without leaking remote resources.
    async fn connect(
        &self,
        api_key: &str,
        local: MediaStream,
        profile: &ModelProfile,
        on_remote: EditedStreamSender,
    ) -> Result<Arc<dyn RemoteSession>, ConnectError>;

    /// Get sink name for logging
    fn name(&self) -> &str;
}

/// An established remote editing session
pub trait RemoteSession: Send + Sync {
    /// Replace the active style prompt. Fire-and-forget.
    fn set_prompt(&self, prompt: &str);

    /// Release all remote resources. Idempotent.
    fn disconnect(&self);

    fn is_connected(&self) -> bool;
}
