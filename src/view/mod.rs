//! Presentation layer: status readout, two video surfaces and the prompt
//! control, driven from console input.

mod console;
mod prompt;
mod surface;

pub use console::Presentation;
pub use prompt::PromptControl;
pub use surface::VideoSurface;
