//! Real-time model profiles
//!
//! A profile pins the frame rate and resolution the remote model expects,
//! which in turn fixes the camera constraints for the whole session.

use crate::capture::CaptureConstraints;
use thiserror::Error;

/// Identifier of the default real-time video-to-video model
pub const DEFAULT_MODEL: &str = "lucy_v2v_720p_rt";

/// Immutable descriptor of a real-time model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelProfile {
    pub id: &'static str,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

const PROFILES: &[ModelProfile] = &[
    ModelProfile {
        id: "lucy_v2v_720p_rt",
        fps: 25,
        width: 1280,
        height: 704,
    },
    ModelProfile {
        id: "mirage",
        fps: 25,
        width: 1280,
        height: 704,
    },
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown real-time model: {0}")]
pub struct UnknownModel(pub String);

impl ModelProfile {
    /// Look up a real-time model by identifier
    pub fn realtime(id: &str) -> Result<Self, UnknownModel> {
        PROFILES
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| UnknownModel(id.to_string()))
    }

    /// Camera constraints matching this model
    pub fn constraints(&self) -> CaptureConstraints {
        CaptureConstraints {
            frame_rate: self.fps,
            width: self.width,
            height: self.height,
        }
    }
}

impl Default for ModelProfile {
    fn default() -> Self {
        PROFILES[0].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_is_known() {
        let profile = ModelProfile::realtime(DEFAULT_MODEL).unwrap();
        assert_eq!(profile, ModelProfile::default());
        assert_eq!(profile.fps, 25);
        assert_eq!((profile.width, profile.height), (1280, 704));
    }

    #[test]
    fn test_constraints_follow_profile() {
        let c = ModelProfile::default().constraints();
        assert_eq!(c.frame_rate, 25);
        assert_eq!(c.width, 1280);
        assert_eq!(c.height, 704);
    }

    #[test]
    fn test_unknown_model_rejected() {
        let err = ModelProfile::realtime("nope").unwrap_err();
        assert_eq!(err.to_string(), "Unknown real-time model: nope");
    }
}
