use crate::session::SessionBootstrapper;

/// Free-form style prompt as edited by the user
#[derive(Debug, Clone)]
pub struct PromptControl {
    text: String,
}

impl PromptControl {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            text: initial.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Push the current text to the session. No-op unless live.
    pub fn apply(&self, session: &SessionBootstrapper) -> bool {
        session.apply_prompt(&self.text)
    }
}
