//! Viewport synchronizer
//!
//! Keeps the remote PTY's size in step with the visible grid. Every
//! container resize re-fits the widget and sends the committed geometry;
//! the other re-fit triggers only send when the geometry actually moved.
//! A channel that is not up yet never stops the widget from re-fitting.

use std::fmt;

use tracing::{debug, error, warn};

use crate::channel::ChannelError;
use crate::geometry::{Geometry, ResizeMessage};
use crate::page::Container;
use crate::session::Session;
use crate::widget::TerminalWidget;

/// What caused a re-fit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitReason {
    ContainerResize,
    /// Deferred fit armed when the page script starts
    InitialLayout,
    PageReady,
    /// Deferred fit after the page finished loading
    LayoutSettled,
    ThemeApplied,
}

impl fmt::Display for FitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FitReason::ContainerResize => "container-resize",
            FitReason::InitialLayout => "initial-layout",
            FitReason::PageReady => "page-ready",
            FitReason::LayoutSettled => "layout-settled",
            FitReason::ThemeApplied => "theme-applied",
        };
        f.write_str(s)
    }
}

/// Result of one synchronization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Committed geometry after fitting
    pub geometry: Geometry,
    /// Whether fitting changed the geometry
    pub changed: bool,
    /// `None` when no update was attempted
    pub sent: Option<Result<(), ChannelError>>,
}

impl SyncOutcome {
    pub fn delivered(&self) -> bool {
        matches!(self.sent, Some(Ok(())))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportSync;

impl ViewportSync {
    pub fn new() -> Self {
        Self
    }

    /// Handle a container size change: fit, then always inform the backend
    pub fn on_container_resize<W, C>(&self, session: &mut Session<W>, container: &C) -> SyncOutcome
    where
        W: TerminalWidget,
        C: Container + ?Sized,
    {
        self.sync(session, container, FitReason::ContainerResize, true)
    }

    /// Re-fit for a non-resize trigger; the backend hears about it only if
    /// the geometry changed.
    ///
    /// Legacy pages sent `set_pty_size` from the window resize listener
    /// alone. Backends will also see a `cols:..::rows:..` message here after
    /// page load, theme changes and the deferred fits whenever the grid moved.
    pub fn refit<W, C>(&self, session: &mut Session<W>, container: &C, reason: FitReason) -> SyncOutcome
    where
        W: TerminalWidget,
        C: Container + ?Sized,
    {
        self.sync(session, container, reason, false)
    }

    fn sync<W, C>(
        &self,
        session: &mut Session<W>,
        container: &C,
        reason: FitReason,
        always_send: bool,
    ) -> SyncOutcome
    where
        W: TerminalWidget,
        C: Container + ?Sized,
    {
        let before = session.widget.geometry();
        let geometry = session.fit.fit(&mut session.widget, container);
        let changed = geometry != before;

        let sent = if always_send || changed {
            Some(self.send(session, geometry, reason))
        } else {
            debug!(%reason, %geometry, "geometry unchanged, not notifying backend");
            None
        };

        SyncOutcome {
            geometry,
            changed,
            sent,
        }
    }

    fn send<W>(&self, session: &Session<W>, geometry: Geometry, reason: FitReason) -> Result<(), ChannelError> {
        let message = ResizeMessage::encode(session.wire_format, geometry);
        debug!(%reason, "front end resize event: {}", message);

        session.channel.set_pty_size(&message).inspect_err(|e| match e {
            ChannelError::NotReady => warn!(%reason, "skipping pty resize: {}", e),
            _ => error!(%reason, "pty resize failed: {}", e),
        })
    }
}
