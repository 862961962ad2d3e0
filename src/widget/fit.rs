//! Fit geometry to the container
//!
//! Mirrors the usual terminal fit addon: the usable width is the container
//! width minus the scrollbar, divided by the cell width; the usable height
//! is divided by the cell height. A proposal is never smaller than 2x1.

use tracing::trace;

use super::TerminalWidget;
use crate::geometry::Geometry;
use crate::page::Container;

const MINIMUM_COLS: u16 = 2;
const MINIMUM_ROWS: u16 = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct FitAddon;

impl FitAddon {
    pub fn new() -> Self {
        Self
    }

    /// Geometry the widget would have at the container's current size.
    ///
    /// `None` while cell metrics are unknown.
    pub fn propose<W, C>(&self, widget: &W, container: &C) -> Option<Geometry>
    where
        W: TerminalWidget + ?Sized,
        C: Container + ?Sized,
    {
        let cell = widget.cell_size().filter(|c| c.is_measured())?;
        let size = container.inner_size();

        let available_width = (size.width - container.scrollbar_width() as f64).max(0.0);
        let available_height = size.height.max(0.0);

        let cols = to_dim(available_width / cell.width).max(MINIMUM_COLS);
        let rows = to_dim(available_height / cell.height).max(MINIMUM_ROWS);
        Some(Geometry::new(cols, rows))
    }

    /// Resize the widget to the proposed geometry if it differs.
    ///
    /// Returns the committed geometry after fitting.
    pub fn fit<W, C>(&self, widget: &mut W, container: &C) -> Geometry
    where
        W: TerminalWidget + ?Sized,
        C: Container + ?Sized,
    {
        let current = widget.geometry();
        match self.propose(widget, container) {
            Some(proposed) if proposed != current => {
                trace!(%current, %proposed, "fit resizing widget");
                widget.resize(proposed);
            }
            Some(_) => {}
            None => trace!("fit skipped, cell metrics unknown"),
        }
        widget.geometry()
    }
}

fn to_dim(cells: f64) -> u16 {
    if cells.is_finite() {
        cells.floor().clamp(0.0, u16::MAX as f64) as u16
    } else {
        0
    }
}
