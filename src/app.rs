//! Terminal page event loop
//!
//! All page activity funnels through one unbounded queue drained by a
//! single task, so every handler runs to completion before the next event
//! is looked at. Events of one kind are handled in arrival order; different
//! kinds interleave however they were posted.
//!
//! Deferred re-fits are fire-once timers that post back into the queue.
//! Once the page is unloaded their posts are dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::bridge::Bridge;
use crate::channel::ChannelHandle;
use crate::config::{BridgeConfig, FitConfig};
use crate::page::{Container, Document};
use crate::session::Session;
use crate::theme::ThemeManager;
use crate::viewport::{FitReason, ViewportSync};
use crate::widget::TerminalWidget;

/// Everything that can happen to the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// User input produced by the widget
    Input(String),
    /// Output delivered by the backend
    Output(String),
    /// Error message delivered by the backend
    BackendError(String),
    BackendClosed,
    /// The container's pixel size changed; the new size is queried on handling
    ContainerResized,
    /// Page finished loading
    Loaded,
    SelectTheme(String),
    DeferredFit(FitReason),
    /// Page teardown; ends the loop
    Unload,
}

/// Cloneable entry point for posting events to a page
#[derive(Debug, Clone)]
pub struct PageHandle {
    tx: mpsc::UnboundedSender<PageEvent>,
}

impl PageHandle {
    pub fn post(&self, event: PageEvent) {
        if self.tx.send(event).is_err() {
            trace!("page unloaded, dropping event");
        }
    }

    pub fn input(&self, text: impl Into<String>) {
        self.post(PageEvent::Input(text.into()));
    }

    /// Backend output callback
    pub fn output(&self, text: impl Into<String>) {
        self.post(PageEvent::Output(text.into()));
    }

    pub fn backend_error(&self, message: impl Into<String>) {
        self.post(PageEvent::BackendError(message.into()));
    }

    pub fn backend_closed(&self) {
        self.post(PageEvent::BackendClosed);
    }

    pub fn container_resized(&self) {
        self.post(PageEvent::ContainerResized);
    }

    pub fn loaded(&self) {
        self.post(PageEvent::Loaded);
    }

    pub fn select_theme(&self, name: impl Into<String>) {
        self.post(PageEvent::SelectTheme(name.into()));
    }

    pub fn unload(&self) {
        self.post(PageEvent::Unload);
    }
}

/// A loaded terminal page: one widget, one channel, one document
pub struct TerminalPage<W, D> {
    session: Session<W>,
    document: D,
    bridge: Bridge,
    viewport: ViewportSync,
    themes: ThemeManager,
    fit_config: FitConfig,
    tx: mpsc::UnboundedSender<PageEvent>,
    rx: mpsc::UnboundedReceiver<PageEvent>,
}

impl<W, D> TerminalPage<W, D>
where
    W: TerminalWidget,
    D: Document + Container,
{
    /// Wire the widget's input to the page queue and assemble the components
    pub fn new(config: &BridgeConfig, mut widget: W, document: D, channel: ChannelHandle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let input = PageHandle { tx: tx.clone() };
        widget.on_data(Box::new(move |text: &str| input.input(text)));

        let session = Session::new(widget, channel).with_wire_format(config.channel.wire_format);

        Self {
            session,
            document,
            bridge: Bridge::new(),
            viewport: ViewportSync::new(),
            themes: ThemeManager::default(),
            fit_config: config.fit.clone(),
            tx,
            rx,
        }
    }

    pub fn handle(&self) -> PageHandle {
        PageHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn session(&self) -> &Session<W> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<W> {
        &mut self.session
    }

    pub fn widget(&self) -> &W {
        &self.session.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.session.widget
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn themes(&self) -> &ThemeManager {
        &self.themes
    }

    /// Drain events until the page is unloaded.
    ///
    /// Arms the initial deferred fit first. The page holds its own sender,
    /// so only `PageEvent::Unload` ends the loop.
    pub async fn run(&mut self) {
        info!("terminal page started");
        self.schedule_fit(self.fit_config.initial_delay(), FitReason::InitialLayout);

        while let Some(event) = self.rx.recv().await {
            if !self.dispatch(event) {
                break;
            }
        }
        info!("terminal page unloaded");
    }

    /// Handle one event. Returns false once the page has been unloaded.
    pub fn dispatch(&mut self, event: PageEvent) -> bool {
        trace!(?event, "dispatch");
        match event {
            PageEvent::Input(text) => {
                // Failure already logged by the bridge; the keystroke is dropped
                self.bridge.on_local_input(&self.session, &text).ok();
            }
            PageEvent::Output(text) => self.bridge.on_remote_output(&mut self.session, &text),
            PageEvent::BackendError(message) => {
                self.bridge.on_remote_error(&mut self.session, &message)
            }
            PageEvent::BackendClosed => self.bridge.on_remote_closed(&mut self.session),
            PageEvent::ContainerResized => {
                self.viewport
                    .on_container_resize(&mut self.session, &self.document);
            }
            PageEvent::Loaded => {
                self.session.widget.focus();
                self.viewport
                    .refit(&mut self.session, &self.document, FitReason::PageReady);
                self.schedule_fit(self.fit_config.settle_delay(), FitReason::LayoutSettled);
            }
            PageEvent::SelectTheme(name) => {
                let applied =
                    self.themes
                        .apply_theme(&name, &mut self.session.widget, &mut self.document);
                if applied {
                    self.viewport
                        .refit(&mut self.session, &self.document, FitReason::ThemeApplied);
                }
            }
            PageEvent::DeferredFit(reason) => {
                self.viewport.refit(&mut self.session, &self.document, reason);
            }
            PageEvent::Unload => {
                self.rx.close();
                return false;
            }
        }
        true
    }

    fn schedule_fit(&self, delay: Duration, reason: FitReason) {
        debug!(%reason, ?delay, "scheduling deferred fit");
        let handle = self.handle();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            handle.post(PageEvent::DeferredFit(reason));
        });
    }
}
