use crate::capture::MediaStream;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Log a progress line every this many rendered frames
const LOG_EVERY: u64 = 250;

struct Binding {
    stream: MediaStream,
    task: JoinHandle<()>,
}

/// A video output bound to at most one stream at a time
///
/// Binding a new stream replaces the previous one. "Rendering" consumes
/// frames and records what was shown.
pub struct VideoSurface {
    name: String,
    binding: Option<Binding>,
    frames_rendered: Arc<AtomicU64>,
    last_style: Arc<Mutex<Option<String>>>,
}

impl VideoSurface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binding: None,
            frames_rendered: Arc::new(AtomicU64::new(0)),
            last_style: Arc::new(Mutex::new(None)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the bound source. Rebinding the same stream is a no-op.
    pub fn bind(&mut self, stream: Option<MediaStream>) {
        if self.binding.as_ref().map(|b| &b.stream) == stream.as_ref() {
            return;
        }

        if let Some(old) = self.binding.take() {
            old.task.abort();
            debug!("{}: unbound stream {}", self.name, old.stream.id());
        }

        let Some(stream) = stream else {
            info!("{}: no source", self.name);
            return;
        };

        info!("{}: bound stream {} ({})", self.name, stream.label(), stream.id());

        let task = tokio::spawn(render(
            self.name.clone(),
            stream.clone(),
            Arc::clone(&self.frames_rendered),
            Arc::clone(&self.last_style),
        ));
        self.binding = Some(Binding { stream, task });
    }

    pub fn source(&self) -> Option<&MediaStream> {
        self.binding.as_ref().map(|b| &b.stream)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered.load(Ordering::Relaxed)
    }

    /// Style tag of the most recently rendered frame
    pub fn last_style(&self) -> Option<String> {
        self.last_style.lock().clone()
    }
}

impl Drop for VideoSurface {
    fn drop(&mut self) {
        if let Some(binding) = self.binding.take() {
            binding.task.abort();
        }
    }
}

async fn render(
    name: String,
    stream: MediaStream,
    frames_rendered: Arc<AtomicU64>,
    last_style: Arc<Mutex<Option<String>>>,
) {
    let mut frames = stream.subscribe();

    loop {
        let frame = tokio::select! {
            _ = stream.stopped() => break,
            frame = frames.recv() => frame,
        };

        match frame {
            Ok(frame) => {
                *last_style.lock() = frame.style;
                let n = frames_rendered.fetch_add(1, Ordering::Relaxed) + 1;
                if n % LOG_EVERY == 0 {
                    debug!("{}: {} frames rendered ({}x{})", name, n, frame.width, frame.height);
                }
            }
            Err(RecvError::Lagged(skipped)) => debug!("{}: dropped {} frames", name, skipped),
            Err(RecvError::Closed) => break,
        }
    }

    debug!("{}: stream {} ended", name, stream.id());
}
