//! In-memory terminal widget
//!
//! Keeps every write verbatim and records focus, theme and resizes so an
//! embedder without a real renderer (and the test suite) can drive the
//! bridge.

use super::{DataCallback, TerminalOptions, TerminalWidget};
use crate::geometry::{CellSize, Geometry};
use crate::theme::ThemeDescriptor;

pub struct HeadlessTerminal {
    options: TerminalOptions,
    geometry: Geometry,
    cell_size: Option<CellSize>,
    theme: ThemeDescriptor,
    writes: Vec<String>,
    focused: bool,
    resize_count: usize,
    on_data: Option<DataCallback>,
}

impl HeadlessTerminal {
    pub fn new(options: TerminalOptions) -> Self {
        // Rough monospace metrics until something measures the real font
        let font = options.font_size as f64;
        Self {
            theme: options.theme,
            options,
            geometry: Geometry::default(),
            cell_size: Some(CellSize::new(font * 0.6, font * 1.2)),
            writes: Vec::new(),
            focused: false,
            resize_count: 0,
            on_data: None,
        }
    }

    pub fn with_cell_size(mut self, cell: CellSize) -> Self {
        self.cell_size = Some(cell);
        self
    }

    pub fn options(&self) -> &TerminalOptions {
        &self.options
    }

    /// Every write in arrival order
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    /// Concatenated output
    pub fn contents(&self) -> String {
        self.writes.concat()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn theme(&self) -> ThemeDescriptor {
        self.theme
    }

    pub fn resize_count(&self) -> usize {
        self.resize_count
    }

    /// Simulate the user typing or pasting `text`
    pub fn type_input(&mut self, text: &str) {
        if let Some(callback) = self.on_data.as_mut() {
            callback(text);
        }
    }
}

impl TerminalWidget for HeadlessTerminal {
    fn write(&mut self, data: &str) {
        self.writes.push(data.to_string());
    }

    fn on_data(&mut self, callback: DataCallback) {
        self.on_data = Some(callback);
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn resize(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        self.resize_count += 1;
    }

    fn cell_size(&self) -> Option<CellSize> {
        self.cell_size
    }

    fn set_theme(&mut self, theme: &ThemeDescriptor) {
        self.theme = *theme;
    }
}
