//! Terminal presentation layer
//!
//! Draws the render model with ratatui and turns key presses into session events.

pub mod input;
pub mod layout;
pub mod renderer;
pub mod terminal;

pub use terminal::run_ui;
