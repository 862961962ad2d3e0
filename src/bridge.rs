//! Render/input bridge
//!
//! Relays keystrokes from the widget to the backend and backend output to
//! the widget. Both directions are verbatim: no buffering, batching or
//! splitting. Ordering within a direction comes from the single event loop
//! that calls in here.

use crossterm::style::Stylize;
use tracing::{error, trace, warn};

use crate::channel::ChannelError;
use crate::session::Session;
use crate::widget::TerminalWidget;

const CRLF: &str = "\r\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct Bridge;

impl Bridge {
    pub fn new() -> Self {
        Self
    }

    /// Forward one input event to the backend.
    ///
    /// Failures are logged and returned; nothing is queued for retry.
    pub fn on_local_input<W: TerminalWidget>(
        &self,
        session: &Session<W>,
        text: &str,
    ) -> Result<(), ChannelError> {
        trace!(len = text.len(), "forwarding input");
        session.channel.write_data(text).inspect_err(|e| match e {
            ChannelError::NotReady => warn!("dropping input: {}", e),
            _ => error!("failed to forward input: {}", e),
        })
    }

    /// Render one output delivery from the backend
    pub fn on_remote_output<W: TerminalWidget>(&self, session: &mut Session<W>, text: &str) {
        session.widget.write(text);
    }

    /// Render a backend-reported error as a red line
    pub fn on_remote_error<W: TerminalWidget>(&self, session: &mut Session<W>, message: &str) {
        warn!("backend error: {}", message);
        session.widget.write(&notice(message));
    }

    /// Tell the user the backend went away. There is no reconnection.
    pub fn on_remote_closed<W: TerminalWidget>(&self, session: &mut Session<W>) {
        warn!("backend channel closed");
        session.widget.write(&notice("Connection closed"));
    }
}

fn notice(text: &str) -> String {
    format!("{}{}{}", CRLF, text.red(), CRLF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{self, ChannelHandle, RemoteRequest};
    use crate::widget::{HeadlessTerminal, TerminalOptions};
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn session() -> Session<HeadlessTerminal> {
        Session::new(
            HeadlessTerminal::new(TerminalOptions::default()),
            ChannelHandle::new(),
        )
    }

    #[test]
    fn input_is_forwarded_once_per_event_in_order() {
        let session = session();
        let (backend, mut remote) = channel::pair();
        session.channel.mark_ready(Arc::new(backend));

        let bridge = Bridge::new();
        for key in ["l", "s", " ", "-la", "\r", "\x03"] {
            assert_ok!(bridge.on_local_input(&session, key));
        }

        let mut received = Vec::new();
        while let Some(Ok(RemoteRequest::Input(text))) = remote.try_recv() {
            received.push(text);
        }
        assert_eq!(received, vec!["l", "s", " ", "-la", "\r", "\x03"]);
    }

    #[test]
    fn input_before_handshake_is_dropped_without_panic() {
        let session = session();
        let result = Bridge::new().on_local_input(&session, "x");
        assert_eq!(assert_err!(result), ChannelError::NotReady);
    }

    #[test]
    fn output_is_written_verbatim_in_order() {
        let mut session = session();
        let bridge = Bridge::new();
        let chunks = ["\x1b[1;32muser@host\x1b[0m:~$ ", "ls\r\n", "a  b\r\n", "a  b\r\n"];
        for chunk in chunks {
            bridge.on_remote_output(&mut session, chunk);
        }

        assert_eq!(session.widget.writes(), chunks);
    }

    #[test]
    fn backend_error_is_rendered_red() {
        let mut session = session();
        Bridge::new().on_remote_error(&mut session, "auth failed");

        let out = session.widget.contents();
        assert!(out.contains("auth failed"));
        assert!(out.contains("\x1b["));
        assert!(out.ends_with("\r\n"));
    }

    #[test]
    fn closed_notice() {
        let mut session = session();
        Bridge::new().on_remote_closed(&mut session);
        assert!(session.widget.contents().contains("Connection closed"));
    }
}
