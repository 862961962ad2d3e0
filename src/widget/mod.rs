//! Terminal-emulator widget interface
//!
//! The widget renders output, decodes keystrokes and measures its font.
//! This crate drives it only through `TerminalWidget`.

pub mod fit;
pub mod headless;

use serde::Deserialize;

use crate::geometry::{CellSize, Geometry};
use crate::theme::{Color, ThemeDescriptor};

pub use fit::FitAddon;
pub use headless::HeadlessTerminal;

/// Observer invoked with every chunk of user input (keystrokes, paste)
pub type DataCallback = Box<dyn FnMut(&str) + Send>;

pub trait TerminalWidget {
    /// Render text; control sequences are interpreted by the widget
    fn write(&mut self, data: &str);

    /// Subscribe to user input. A later subscription replaces the earlier one.
    fn on_data(&mut self, callback: DataCallback);

    fn focus(&mut self);

    /// Committed column/row count
    fn geometry(&self) -> Geometry;

    fn resize(&mut self, geometry: Geometry);

    /// Measured cell metrics, `None` until the font has been measured
    fn cell_size(&self) -> Option<CellSize>;

    fn set_theme(&mut self, theme: &ThemeDescriptor);
}

/// Widget construction options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerminalOptions {
    /// Lines kept above the viewport
    pub scrollback: usize,
    pub font_size: u16,
    pub font_family: String,
    pub cursor_blink: bool,
    /// Colours used before any theme is selected
    pub theme: ThemeDescriptor,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            scrollback: 1000,
            font_size: 14,
            font_family: "monospace".to_string(),
            cursor_blink: true,
            theme: ThemeDescriptor::new(Color::WHITE, Color::hex(0x141414), Color::WHITE),
        }
    }
}
