use crate::profile::ModelProfile;

/// Prompt applied once the session goes live
pub const DEFAULT_PROMPT: &str = "Anime style";

/// Configuration for a style-transfer session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Model profile; fixes capture constraints for the session
    pub profile: ModelProfile,

    /// Prompt pushed to the remote session when it becomes live
    pub initial_prompt: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            profile: ModelProfile::default(),
            initial_prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}
