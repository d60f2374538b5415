use super::config::SessionConfig;
use super::error::SessionError;
use super::status::{SessionState, SessionStatus};
use crate::capture::{CaptureSource, MediaStream};
use crate::credential::CredentialProvider;
use crate::remote::{RemoteSession, RemoteSink};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// External collaborators the bootstrap chain drives
#[derive(Clone)]
pub struct Collaborators {
    pub credentials: Arc<dyn CredentialProvider>,
    pub camera: Arc<dyn CaptureSource>,
    pub sink: Arc<dyn RemoteSink>,
}

/// Mutable session state; only ever touched under `Shared::inner`
struct Inner {
    /// Active mount. Bumped on every mount so late results from an older
    /// chain can be recognised and discarded.
    generation: u64,
    state: SessionState,
    streaming: bool,
    cancel: CancellationToken,
    local: Option<MediaStream>,
    remote: Option<Arc<dyn RemoteSession>>,
}

impl Inner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && !self.state.is_terminal()
    }

    /// Cancel the in-flight chain and drop every resource it handed over
    fn release(&mut self) {
        self.cancel.cancel();
        if let Some(remote) = self.remote.take() {
            remote.disconnect();
            info!("Remote session {} disconnected", self.generation);
        }
        if let Some(local) = self.local.take() {
            local.stop();
        }
    }
}

struct Shared {
    inner: Mutex<Inner>,
    status: watch::Sender<SessionStatus>,
    local: watch::Sender<Option<MediaStream>>,
    edited: watch::Sender<Option<MediaStream>>,
}

impl Shared {
    fn publish(&self, inner: &Inner) {
        self.status.send_replace(SessionStatus {
            generation: inner.generation,
            state: inner.state.clone(),
            streaming: inner.streaming,
        });
    }

    fn advance(&self, generation: u64, next: SessionState) -> bool {
        let mut inner = self.inner.lock();
        if !inner.is_current(generation) {
            debug!("Session {} is stale, not entering {:?}", generation, next);
            return false;
        }
        inner.state = next;
        self.publish(&inner);
        true
    }

    fn fail(&self, generation: u64, error: SessionError) {
        let mut inner = self.inner.lock();
        if !inner.is_current(generation) {
            debug!("Discarding failure from stale session {}: {}", generation, error);
            return;
        }
        warn!("Session {} failed: {}", generation, error);
        inner.state = SessionState::Failed(error);
        self.publish(&inner);
    }

    fn adopt_local(&self, generation: u64, local: MediaStream) -> bool {
        let mut inner = self.inner.lock();
        if !inner.is_current(generation) {
            drop(inner);
            warn!("Camera opened after session {} ended; releasing it", generation);
            local.stop();
            return false;
        }
        inner.local = Some(local.clone());
        inner.state = SessionState::Connecting;
        self.local.send_replace(Some(local));
        self.publish(&inner);
        true
    }

    fn go_live(&self, generation: u64, remote: Arc<dyn RemoteSession>, prompt: &str) -> bool {
        let mut inner = self.inner.lock();
        if !inner.is_current(generation) {
            drop(inner);
            warn!("Remote connected after session {} ended; disconnecting", generation);
            remote.disconnect();
            return false;
        }
        remote.set_prompt(prompt);
        inner.remote = Some(remote);
        inner.state = SessionState::Live;
        self.publish(&inner);
        true
    }

    fn accept_edited(&self, generation: u64, stream: MediaStream) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != generation || !inner.state.accepts_remote_stream() {
            debug!("Ignoring edited stream for inactive session {}", generation);
            return false;
        }
        if !inner.streaming {
            info!("First edited stream received for session {}", generation);
            inner.streaming = true;
            self.publish(&inner);
        }
        self.edited.send_replace(Some(stream));
        true
    }
}

/// Establishes and owns one live style-transfer session per mount
///
/// Each mount runs credential fetch, camera capture and remote connect in
/// order on a spawned task. The first failing stage is terminal. Teardown
/// cancels whatever is in flight and releases the camera and the remote
/// session; it also runs on drop.
pub struct SessionBootstrapper {
    shared: Arc<Shared>,
    collaborators: Collaborators,
    config: SessionConfig,
}

impl SessionBootstrapper {
    pub fn new(collaborators: Collaborators, config: SessionConfig) -> Self {
        let (status, _) = watch::channel(SessionStatus::idle());
        let (local, _) = watch::channel(None);
        let (edited, _) = watch::channel(None);

        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                generation: 0,
                state: SessionState::Idle,
                streaming: false,
                cancel: CancellationToken::new(),
                local: None,
                remote: None,
            }),
            status,
            local,
            edited,
        });

        Self {
            shared,
            collaborators,
            config,
        }
    }

    /// Create and immediately mount. Must be called within a tokio runtime.
    pub fn start(collaborators: Collaborators, config: SessionConfig) -> Self {
        let bootstrapper = Self::new(collaborators, config);
        bootstrapper.mount();
        bootstrapper
    }

    /// Start a fresh bootstrap chain, releasing anything a previous mount
    /// held. Returns the new session generation.
    pub fn mount(&self) -> u64 {
        let (generation, cancel) = {
            let mut inner = self.shared.inner.lock();
            inner.release();
            inner.generation += 1;
            inner.cancel = CancellationToken::new();
            inner.streaming = false;
            inner.state = SessionState::FetchingCredential;
            self.shared.local.send_replace(None);
            self.shared.edited.send_replace(None);
            self.shared.publish(&inner);
            (inner.generation, inner.cancel.clone())
        };

        info!("Mounting session {}", generation);

        tokio::spawn(bootstrap(
            Arc::clone(&self.shared),
            self.collaborators.clone(),
            self.config.clone(),
            generation,
            cancel,
        ));

        generation
    }

    /// Push `prompt` to the remote session
    ///
    /// Only takes effect while live. Anything else is a silent no-op: the
    /// prompt is dropped, not queued. Returns whether it was applied.
    pub fn apply_prompt(&self, prompt: &str) -> bool {
        let inner = self.shared.inner.lock();
        match (&inner.state, &inner.remote) {
            (SessionState::Live, Some(remote)) => {
                remote.set_prompt(prompt);
                info!("Applied new prompt: {}", prompt);
                true
            }
            _ => {
                debug!("Session not live ({:?}); dropping prompt {:?}", inner.state, prompt);
                false
            }
        }
    }

    /// Release the session. Safe in any state and safe to repeat.
    pub fn teardown(&self) {
        let mut inner = self.shared.inner.lock();
        if inner.state == SessionState::TornDown {
            debug!("Session {} already torn down", inner.generation);
            return;
        }

        inner.release();
        inner.state = SessionState::TornDown;
        inner.streaming = false;
        self.shared.local.send_replace(None);
        self.shared.edited.send_replace(None);
        self.shared.publish(&inner);

        info!("Session {} torn down", inner.generation);
    }

    pub fn state(&self) -> SessionState {
        self.shared.inner.lock().state.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.shared.status.borrow().clone()
    }

    pub fn generation(&self) -> u64 {
        self.shared.inner.lock().generation
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SessionStatus> {
        self.shared.status.subscribe()
    }

    /// Local preview; `None` until the camera is granted and after teardown
    pub fn local_stream(&self) -> watch::Receiver<Option<MediaStream>> {
        self.shared.local.subscribe()
    }

    /// Latest edited stream; each delivery replaces the previous one
    pub fn edited_stream(&self) -> watch::Receiver<Option<MediaStream>> {
        self.shared.edited.subscribe()
    }
}

impl Drop for SessionBootstrapper {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Await `fut` unless `cancel` fires first, in which case `fut` is dropped
async fn until_cancelled<F: Future>(cancel: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        out = fut => Some(out),
    }
}

async fn bootstrap(
    shared: Arc<Shared>,
    collaborators: Collaborators,
    config: SessionConfig,
    generation: u64,
    cancel: CancellationToken,
) {
    info!(
        "Bootstrapping session {} (model {}, credentials via {})",
        generation,
        config.profile.id,
        collaborators.credentials.name()
    );

    let api_key = match until_cancelled(&cancel, collaborators.credentials.fetch()).await {
        None => {
            debug!("Session {} cancelled while fetching credentials", generation);
            return;
        }
        Some(Err(e)) => {
            shared.fail(generation, e.into());
            return;
        }
        Some(Ok(key)) => key,
    };

    if !shared.advance(generation, SessionState::RequestingCapture) {
        return;
    }

    let constraints = config.profile.constraints();
    let local = match until_cancelled(&cancel, collaborators.camera.open(&constraints)).await {
        None => {
            debug!("Session {} cancelled while requesting camera", generation);
            return;
        }
        Some(Err(e)) => {
            shared.fail(generation, e.into());
            return;
        }
        Some(Ok(stream)) => stream,
    };

    if !shared.adopt_local(generation, local.clone()) {
        return;
    }

    let (on_remote, remote_streams) = mpsc::unbounded_channel();
    tokio::spawn(forward_edited(
        Arc::clone(&shared),
        generation,
        cancel.clone(),
        remote_streams,
    ));

    let connect = collaborators
        .sink
        .connect(&api_key, local, &config.profile, on_remote);
    let remote = match until_cancelled(&cancel, connect).await {
        None => {
            debug!("Session {} cancelled while connecting", generation);
            return;
        }
        Some(Err(e)) => {
            shared.fail(generation, e.into());
            return;
        }
        Some(Ok(remote)) => remote,
    };

    if shared.go_live(generation, remote, &config.initial_prompt) {
        info!(
            "Session {} live via {} with prompt {:?}",
            generation,
            collaborators.sink.name(),
            config.initial_prompt
        );
    }
}

/// Relay edited streams from the sink until the session goes away
async fn forward_edited(
    shared: Arc<Shared>,
    generation: u64,
    cancel: CancellationToken,
    mut streams: mpsc::UnboundedReceiver<MediaStream>,
) {
    loop {
        let stream = tokio::select! {
            _ = cancel.cancelled() => break,
            stream = streams.recv() => match stream {
                Some(stream) => stream,
                None => break,
            },
        };

        if !shared.accept_edited(generation, stream) {
            break;
        }
    }

    debug!("Edited stream relay for session {} stopped", generation);
}
