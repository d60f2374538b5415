pub mod backend;
pub mod stream;
pub mod synthetic;

pub use backend::{CaptureConstraints, CaptureError, CaptureSource};
pub use stream::{MediaStream, VideoFrame};
pub use synthetic::{CameraAccess, SyntheticCamera, SyntheticCameraConfig};
