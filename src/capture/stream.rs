use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

/// Frames buffered per subscriber before slow readers start lagging
const FRAME_BUFFER: usize = 8;

/// A single RGB24 video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Monotonic frame counter within the producing stream
    pub sequence: u64,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Packed RGB24 pixels, row-major
    pub pixels: Arc<[u8]>,
    /// Style prompt applied to this frame, if it went through a remote editor
    pub style: Option<String>,
    /// When the frame was produced
    pub captured_at: DateTime<Utc>,
}

/// Handle onto a live video stream
///
/// Cloning is cheap; every clone refers to the same stream. Producers push
/// frames with [`MediaStream::publish`], consumers call
/// [`MediaStream::subscribe`]. Stopping is idempotent and visible to all
/// clones through [`MediaStream::stopped`].
#[derive(Debug, Clone)]
pub struct MediaStream {
    id: Uuid,
    label: Arc<str>,
    frames: broadcast::Sender<VideoFrame>,
    stop: CancellationToken,
}

impl MediaStream {
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        let (frames, _) = broadcast::channel(FRAME_BUFFER);
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            frames,
            stop: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Push a frame to every current subscriber
    ///
    /// Returns `false` once the stream has been stopped. Having no
    /// subscribers is not an error.
    pub fn publish(&self, frame: VideoFrame) -> bool {
        if self.stop.is_cancelled() {
            return false;
        }
        let _ = self.frames.send(frame);
        true
    }

    pub fn subscribe(&self) -> broadcast::Receiver<VideoFrame> {
        self.frames.subscribe()
    }

    /// Release the stream. Safe to call any number of times.
    pub fn stop(&self) {
        if !self.stop.is_cancelled() {
            info!("Stopping stream {} ({})", self.label, self.id);
            self.stop.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        !self.stop.is_cancelled()
    }

    /// Resolves once [`MediaStream::stop`] has been called on any clone
    pub async fn stopped(&self) {
        self.stop.cancelled().await
    }
}

impl PartialEq for MediaStream {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MediaStream {}
