use super::prompt::PromptControl;
use super::surface::VideoSurface;
use crate::session::SessionBootstrapper;
use anyhow::{Context, Result};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

/// Console front-end for a session
///
/// Mirrors session status into a readout, binds the local and edited
/// streams to their surfaces, and turns input lines into prompt edits.
pub struct Presentation {
    /// Local camera preview
    pub input: VideoSurface,
    /// Edited stream from the remote service
    pub output: VideoSurface,
    prompt: PromptControl,
    status: String,
}

impl Presentation {
    pub fn new(initial_prompt: impl Into<String>) -> Self {
        Self {
            input: VideoSurface::new("Your Camera"),
            output: VideoSurface::new("Edited Output"),
            prompt: PromptControl::new(initial_prompt),
            status: String::new(),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn prompt(&self) -> &PromptControl {
        &self.prompt
    }

    /// One line of input edits the prompt and applies it; a blank line
    /// re-applies the current prompt
    pub fn handle_input(&mut self, line: &str, session: &SessionBootstrapper) -> bool {
        let line = line.trim();
        if !line.is_empty() {
            self.prompt.edit(line);
        }

        let applied = self.prompt.apply(session);
        if !applied {
            info!("Not connected yet; prompt {:?} was not applied", self.prompt.text());
        }
        applied
    }

    fn show_status(&mut self, status: String) {
        if status != self.status {
            info!("Status: {}", status);
            self.status = status;
        }
    }

    /// Drive the presentation until `shutdown` resolves
    ///
    /// Input reaching EOF stops prompt handling but keeps the surfaces and
    /// status running.
    pub async fn run<R, S>(&mut self, session: &SessionBootstrapper, input: R, shutdown: S) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        let mut status = session.subscribe_status();
        let mut local = session.local_stream();
        let mut edited = session.edited_stream();
        let mut lines = input.lines();
        let mut input_open = true;
        tokio::pin!(shutdown);

        let current = status.borrow_and_update().to_string();
        self.show_status(current);
        let current = local.borrow_and_update().clone();
        self.input.bind(current);
        let current = edited.borrow_and_update().clone();
        self.output.bind(current);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                Ok(()) = status.changed() => {
                    let current = status.borrow_and_update().to_string();
                    self.show_status(current);
                }
                Ok(()) = local.changed() => {
                    let current = local.borrow_and_update().clone();
                    self.input.bind(current);
                }
                Ok(()) = edited.changed() => {
                    let current = edited.borrow_and_update().clone();
                    self.output.bind(current);
                }
                line = lines.next_line(), if input_open => {
                    match line.context("Failed to read prompt input")? {
                        Some(line) => {
                            self.handle_input(&line, session);
                        }
                        None => input_open = false,
                    }
                }
            }
        }

        Ok(())
    }
}
