use super::error::SessionError;
use std::fmt;

/// Name of the remote service shown in status text
pub const SERVICE_NAME: &str = "Decart";

/// Bootstrap state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    FetchingCredential,
    RequestingCapture,
    Connecting,
    Live,
    /// Terminal: first failing stage
    Failed(SessionError),
    /// Terminal: torn down by the owner
    TornDown,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Failed(_) | SessionState::TornDown)
    }

    /// States in which an edited stream may be delivered
    pub(crate) fn accepts_remote_stream(&self) -> bool {
        matches!(self, SessionState::Connecting | SessionState::Live)
    }
}

/// Observable projection of the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    /// Mount that produced this status
    pub generation: u64,
    pub state: SessionState,
    /// Set once the first edited stream arrives
    pub streaming: bool,
}

impl SessionStatus {
    pub fn idle() -> Self {
        Self {
            generation: 0,
            state: SessionState::Idle,
            streaming: false,
        }
    }

    pub fn error(&self) -> Option<&SessionError> {
        match &self.state {
            SessionState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            SessionState::Idle | SessionState::TornDown => write!(f, "Disconnected"),
            SessionState::FetchingCredential => write!(f, "Fetching API key..."),
            SessionState::RequestingCapture => write!(f, "Requesting camera..."),
            SessionState::Connecting | SessionState::Live if self.streaming => {
                write!(f, "Connected and Streaming")
            }
            SessionState::Connecting | SessionState::Live => {
                write!(f, "Connecting to {}...", SERVICE_NAME)
            }
            SessionState::Failed(e) => write!(f, "Error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(state: SessionState, streaming: bool) -> String {
        SessionStatus {
            generation: 1,
            state,
            streaming,
        }
        .to_string()
    }

    #[test]
    fn test_status_text() {
        assert_eq!(SessionStatus::idle().to_string(), "Disconnected");
        assert_eq!(status(SessionState::FetchingCredential, false), "Fetching API key...");
        assert_eq!(status(SessionState::RequestingCapture, false), "Requesting camera...");
        assert_eq!(status(SessionState::Connecting, false), "Connecting to Decart...");
        assert_eq!(status(SessionState::Live, false), "Connecting to Decart...");
        assert_eq!(status(SessionState::Live, true), "Connected and Streaming");
        assert_eq!(status(SessionState::TornDown, true), "Disconnected");
    }

    #[test]
    fn test_failed_status_carries_message() {
        let failed = SessionState::Failed(SessionError::CredentialUnavailable(
            "not configured".to_string(),
        ));
        assert!(failed.is_terminal());
        assert_eq!(status(failed, false), "Error: not configured");
    }
}
