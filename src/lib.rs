pub mod capture;
pub mod config;
pub mod credential;
pub mod http;
pub mod profile;
pub mod remote;
pub mod session;
pub mod view;

pub use capture::{
    CameraAccess, CaptureConstraints, CaptureError, CaptureSource, MediaStream, SyntheticCamera,
    SyntheticCameraConfig, VideoFrame,
};
pub use config::Config;
pub use credential::{CredentialError, CredentialProvider, HttpCredentialProvider, SecretSource};
pub use http::{create_router, AppState};
pub use profile::ModelProfile;
pub use remote::{ConnectError, LoopbackSink, RemoteSession, RemoteSink};
pub use session::{
    Collaborators, SessionBootstrapper, SessionConfig, SessionError, SessionState, SessionStatus,
};
pub use view::Presentation;
