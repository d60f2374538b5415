use super::stream::MediaStream;
use thiserror::Error;

/// Capture constraints requested from a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    /// Target frames per second
    pub frame_rate: u32,
    /// Target width in pixels
    pub width: u32,
    /// Target height in pixels
    pub height: u32,
}

/// Why a camera could not be opened
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    NoDevice(String),

    #[error("{0}")]
    ConstraintsUnsatisfiable(String),
}

/// Camera capture backend trait
///
/// Implementations:
/// - Synthetic: moving test pattern, for demos and tests
/// - Platform cameras plug in here behind the same contract
#[async_trait::async_trait]
pub trait CaptureSource: Send + Sync {
    /// Open the camera with the given constraints
    ///
    /// Each call acquires a new stream; the caller owns it and must
    /// [`MediaStream::stop`] it when done. There is no retry on failure.
    async fn open(&self, constraints: &CaptureConstraints) -> Result<MediaStream, CaptureError>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}
