// End-to-end tests: local secret, synthetic camera, loopback editor and the
// console presentation wired together.

use std::sync::Arc;
use std::time::Duration;
use stylecam::capture::{CaptureSource, SyntheticCamera, SyntheticCameraConfig, VideoFrame};
use stylecam::remote::{ConnectError, LoopbackSink, RemoteSink};
use stylecam::session::{Collaborators, SessionBootstrapper, SessionConfig, SessionState};
use stylecam::{MediaStream, ModelProfile, Presentation, SecretSource};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{mpsc, oneshot};

const TIMEOUT: Duration = Duration::from_secs(5);

fn tiny_profile() -> ModelProfile {
    ModelProfile {
        id: "test",
        fps: 50,
        width: 16,
        height: 8,
    }
}

fn collaborators(api_key: Option<&str>) -> Collaborators {
    Collaborators {
        credentials: Arc::new(SecretSource::Fixed(api_key.map(str::to_string))),
        camera: Arc::new(SyntheticCamera::new(SyntheticCameraConfig::default())),
        sink: Arc::new(LoopbackSink::new(Duration::from_millis(10))),
    }
}

fn config() -> SessionConfig {
    SessionConfig {
        profile: tiny_profile(),
        initial_prompt: "Anime style".to_string(),
    }
}

async fn wait_style(frames: &mut broadcast::Receiver<VideoFrame>, style: &str) -> VideoFrame {
    tokio::time::timeout(TIMEOUT, async {
        loop {
            match frames.recv().await {
                Ok(frame) if frame.style.as_deref() == Some(style) => return frame,
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => panic!("edited stream closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for styled frame")
}

#[tokio::test]
async fn test_full_pipeline_applies_prompts() {
    let session = SessionBootstrapper::start(collaborators(Some("abc")), config());
    let mut presentation = Presentation::new("Anime style");
    let (mut writer, reader) = tokio::io::duplex(256);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let session_ref = &session;
    let driver = async move {
        let mut status = session_ref.subscribe_status();
        tokio::time::timeout(TIMEOUT, status.wait_for(|s| s.streaming))
            .await
            .unwrap()
            .unwrap();

        let edited = session_ref.edited_stream().borrow().clone().unwrap();
        let mut frames = edited.subscribe();

        let frame = wait_style(&mut frames, "Anime style").await;
        assert_eq!((frame.width, frame.height), (16, 8));

        writer.write_all(b"Watercolor\n").await.unwrap();
        wait_style(&mut frames, "Watercolor").await;

        stop_tx.send(()).unwrap();
    };

    let run = presentation.run(&session, BufReader::new(reader), async {
        let _ = stop_rx.await;
    });

    let (result, ()) = tokio::join!(run, driver);
    result.unwrap();

    assert_eq!(session.state(), SessionState::Live);
    assert_eq!(presentation.prompt().text(), "Watercolor");
    assert!(presentation.input.source().is_some());
    assert!(presentation.output.source().is_some());

    session.teardown();
    assert!(!session.apply_prompt("Sketch"));
}

#[tokio::test]
async fn test_missing_secret_fails_session() {
    let session = SessionBootstrapper::start(collaborators(None), config());

    let mut status = session.subscribe_status();
    let status = tokio::time::timeout(TIMEOUT, status.wait_for(|s| s.state.is_terminal()))
        .await
        .unwrap()
        .unwrap()
        .clone();

    assert_eq!(
        status.to_string(),
        "Error: API key is not configured on the server environment."
    );
}

#[tokio::test]
async fn test_presentation_drops_prompt_before_live() {
    // Long handshake keeps the session in Connecting
    let collaborators = Collaborators {
        sink: Arc::new(LoopbackSink::new(Duration::from_secs(60))),
        ..collaborators(Some("abc"))
    };
    let session = SessionBootstrapper::start(collaborators, config());
    let mut presentation = Presentation::new("Anime style");

    assert!(!presentation.handle_input("Watercolor", &session));
    assert_eq!(presentation.prompt().text(), "Watercolor");

    // A blank line keeps the edited text
    assert!(!presentation.handle_input("   ", &session));
    assert_eq!(presentation.prompt().text(), "Watercolor");
}

// ============================================================================
// Loopback sink
// ============================================================================

#[tokio::test]
async fn test_loopback_rejects_empty_key() {
    let sink = LoopbackSink::new(Duration::ZERO);
    let (tx, _rx) = mpsc::unbounded_channel();

    let err = sink
        .connect("  ", MediaStream::new("camera"), &tiny_profile(), tx)
        .await
        .err()
        .unwrap();

    assert!(matches!(err, ConnectError::Unauthorized(_)));
}

#[tokio::test]
async fn test_loopback_rejects_stopped_stream() {
    let sink = LoopbackSink::new(Duration::ZERO);
    let (tx, _rx) = mpsc::unbounded_channel();
    let local = MediaStream::new("camera");
    local.stop();

    let err = sink
        .connect("abc", local, &tiny_profile(), tx)
        .await
        .err()
        .unwrap();

    assert!(matches!(err, ConnectError::Transport(_)));
}

#[tokio::test]
async fn test_loopback_disconnect_stops_edited_stream() {
    let camera = SyntheticCamera::new(SyntheticCameraConfig::default());
    let local = camera.open(&tiny_profile().constraints()).await.unwrap();
    let sink = LoopbackSink::new(Duration::ZERO);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let remote = sink
        .connect("abc", local.clone(), &tiny_profile(), tx)
        .await
        .unwrap();
    remote.set_prompt("Neon");

    let edited = tokio::time::timeout(TIMEOUT, rx.recv())
        .await
        .unwrap()
        .unwrap();
    let mut frames = edited.subscribe();
    let frame = wait_style(&mut frames, "Neon").await;
    assert_eq!(frame.pixels.len(), 16 * 8 * 3);

    remote.disconnect();
    remote.disconnect();

    assert!(!remote.is_connected());
    tokio::time::timeout(TIMEOUT, edited.stopped()).await.unwrap();
    local.stop();
}
