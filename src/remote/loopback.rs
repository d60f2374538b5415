//! In-process stand-in for the remote editing service
//!
//! Frames from the local stream are "restyled" (pixels inverted, tagged
//! with the active prompt) and republished on an edited stream. Useful for
//! running the whole pipeline without network access.

use super::sink::{ConnectError, EditedStreamSender, RemoteSession, RemoteSink};
use crate::capture::{MediaStream, VideoFrame};
use crate::profile::ModelProfile;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct LoopbackSink {
    handshake: Duration,
}

impl LoopbackSink {
    /// `handshake` is the simulated time to establish a session
    pub fn new(handshake: Duration) -> Self {
        Self { handshake }
    }
}

impl Default for LoopbackSink {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

#[async_trait::async_trait]
impl RemoteSink for LoopbackSink {
    async fn connect(
        &self,
        api_key: &str,
        local: MediaStream,
        profile: &ModelProfile,
        on_remote: EditedStreamSender,
    ) -> Result<Arc<dyn RemoteSession>, ConnectError> {
        if api_key.trim().is_empty() {
            return Err(ConnectError::Unauthorized("Invalid API key".to_string()));
        }
        if !local.is_active() {
            return Err(ConnectError::Transport(
                "Local stream ended before connect".to_string(),
            ));
        }

        info!("Connecting loopback session for model {}", profile.id);
        tokio::time::sleep(self.handshake).await;

        let session = Arc::new(LoopbackSession::new());
        let worker = Arc::clone(&session);
        tokio::spawn(async move { worker.run(local, on_remote).await });

        info!("Loopback session established");
        Ok(session as Arc<dyn RemoteSession>)
    }

    fn name(&self) -> &str {
        "loopback"
    }
}

pub struct LoopbackSession {
    prompt: RwLock<Option<String>>,
    edited: MediaStream,
    cancel: CancellationToken,
}

impl LoopbackSession {
    fn new() -> Self {
        Self {
            prompt: RwLock::new(None),
            edited: MediaStream::new("edited"),
            cancel: CancellationToken::new(),
        }
    }

    pub fn prompt(&self) -> Option<String> {
        self.prompt.read().clone()
    }

    async fn run(&self, local: MediaStream, on_remote: EditedStreamSender) {
        let mut frames = local.subscribe();
        let mut announced = false;

        loop {
            let frame = tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = local.stopped() => break,
                frame = frames.recv() => frame,
            };

            match frame {
                Ok(frame) => {
                    if !announced {
                        // Receiver gone means nobody is watching; keep editing anyway
                        let _ = on_remote.send(self.edited.clone());
                        announced = true;
                    }
                    self.edited.publish(self.restyle(frame));
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Loopback editor skipped {} frames", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }

        self.edited.stop();
        debug!("Loopback editor stopped");
    }

    fn restyle(&self, frame: VideoFrame) -> VideoFrame {
        let pixels: Vec<u8> = frame.pixels.iter().map(|p| 255 - p).collect();
        VideoFrame {
            pixels: Arc::from(pixels),
            style: self.prompt(),
            ..frame
        }
    }
}

impl RemoteSession for LoopbackSession {
    fn set_prompt(&self, prompt: &str) {
        info!("Loopback prompt set to {:?}", prompt);
        *self.prompt.write() = Some(prompt.to_string());
    }

    fn disconnect(&self) {
        if self.cancel.is_cancelled() {
            debug!("Loopback session already disconnected");
            return;
        }
        self.cancel.cancel();
        self.edited.stop();
        info!("Loopback session disconnected");
    }

    fn is_connected(&self) -> bool {
        !self.cancel.is_cancelled()
    }
}
