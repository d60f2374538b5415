//! Session bootstrap and prompt control
//!
//! This module provides the `SessionBootstrapper` that sequences:
//! - API key retrieval
//! - Camera capture under the model profile's constraints
//! - Remote session establishment and edited-stream wiring
//! - Prompt updates while live, and teardown

mod bootstrap;
mod config;
mod error;
mod status;

pub use bootstrap::{Collaborators, SessionBootstrapper};
pub use config::{SessionConfig, DEFAULT_PROMPT};
pub use error::SessionError;
pub use status::{SessionState, SessionStatus, SERVICE_NAME};
