use super::backend::{CaptureConstraints, CaptureError, CaptureSource};
use super::stream::{MediaStream, VideoFrame};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Whether the synthetic camera behaves as granted, denied or missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraAccess {
    #[default]
    Granted,
    Denied,
    Absent,
}

/// Configuration for the synthetic camera
#[derive(Debug, Clone, Deserialize)]
pub struct SyntheticCameraConfig {
    /// Largest width the camera can produce
    pub max_width: u32,
    /// Largest height the camera can produce
    pub max_height: u32,
    /// Highest frame rate the camera can produce
    pub max_frame_rate: u32,
    /// Simulated permission outcome
    #[serde(default)]
    pub access: CameraAccess,
}

impl Default for SyntheticCameraConfig {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            max_frame_rate: 60,
            access: CameraAccess::Granted,
        }
    }
}

/// Camera that renders a moving test pattern
pub struct SyntheticCamera {
    config: SyntheticCameraConfig,
}

impl SyntheticCamera {
    pub fn new(config: SyntheticCameraConfig) -> Self {
        Self { config }
    }

    fn check(&self, constraints: &CaptureConstraints) -> Result<(), CaptureError> {
        match self.config.access {
            CameraAccess::Granted => {}
            CameraAccess::Denied => {
                return Err(CaptureError::PermissionDenied(
                    "Permission denied by user".to_string(),
                ))
            }
            CameraAccess::Absent => {
                return Err(CaptureError::NoDevice("Requested device not found".to_string()))
            }
        }

        if constraints.width == 0 || constraints.height == 0 || constraints.frame_rate == 0 {
            return Err(CaptureError::ConstraintsUnsatisfiable(format!(
                "Invalid constraints {}x{}@{}",
                constraints.width, constraints.height, constraints.frame_rate
            )));
        }

        if constraints.width > self.config.max_width
            || constraints.height > self.config.max_height
            || constraints.frame_rate > self.config.max_frame_rate
        {
            return Err(CaptureError::ConstraintsUnsatisfiable(format!(
                "Cannot satisfy {}x{}@{} (camera max {}x{}@{})",
                constraints.width,
                constraints.height,
                constraints.frame_rate,
                self.config.max_width,
                self.config.max_height,
                self.config.max_frame_rate
            )));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl CaptureSource for SyntheticCamera {
    async fn open(&self, constraints: &CaptureConstraints) -> Result<MediaStream, CaptureError> {
        self.check(constraints)?;

        info!(
            "Opening synthetic camera at {}x{}@{}fps",
            constraints.width, constraints.height, constraints.frame_rate
        );

        let stream = MediaStream::new("camera");
        let producer = stream.clone();
        let constraints = *constraints;

        tokio::spawn(async move {
            let period = Duration::from_secs_f64(1.0 / constraints.frame_rate as f64);
            let mut ticker = tokio::time::interval(period);
            let mut sequence = 0u64;

            loop {
                tokio::select! {
                    _ = producer.stopped() => break,
                    _ = ticker.tick() => {
                        let frame = test_pattern(&constraints, sequence);
                        if !producer.publish(frame) {
                            break;
                        }
                        sequence += 1;
                    }
                }
            }

            debug!("Synthetic camera stopped after {} frames", sequence);
        });

        Ok(stream)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// Diagonal gradient that scrolls one pixel per frame
fn test_pattern(constraints: &CaptureConstraints, sequence: u64) -> VideoFrame {
    let (width, height) = (constraints.width as usize, constraints.height as usize);
    let offset = sequence as usize;
    let mut pixels = Vec::with_capacity(width * height * 3);

    for y in 0..height {
        for x in 0..width {
            let v = ((x + y + offset) % 256) as u8;
            pixels.extend_from_slice(&[v, v.wrapping_add(85), v.wrapping_add(170)]);
        }
    }

    VideoFrame {
        sequence,
        width: constraints.width,
        height: constraints.height,
        pixels: Arc::from(pixels),
        style: None,
        captured_at: Utc::now(),
    }
}
