//! Shared terminal session context
//!
//! One widget, one fit addon and one channel handle per page. Components
//! receive this context explicitly instead of reaching for globals.

use crate::channel::ChannelHandle;
use crate::geometry::WireFormat;
use crate::widget::{FitAddon, TerminalWidget};

pub struct Session<W> {
    pub widget: W,
    pub fit: FitAddon,
    pub channel: ChannelHandle,
    /// Encoding of geometry updates sent to the backend
    pub wire_format: WireFormat,
}

impl<W: TerminalWidget> Session<W> {
    pub fn new(widget: W, channel: ChannelHandle) -> Self {
        Self {
            widget,
            fit: FitAddon::new(),
            channel,
            wire_format: WireFormat::default(),
        }
    }

    pub fn with_wire_format(mut self, format: WireFormat) -> Self {
        self.wire_format = format;
        self
    }
}
