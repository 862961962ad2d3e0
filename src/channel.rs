//! Backend channel handle
//!
//! The backend's callable surface only exists after an asynchronous
//! handshake. `ChannelHandle` models that as a one-way unset -> ready slot;
//! every call made before readiness fails with `ChannelError::NotReady`
//! instead of panicking.

use std::future::Future;
use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::geometry::{Geometry, GeometryError, ResizeMessage};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("channel may not be up yet")]
    NotReady,
    #[error("channel closed")]
    Closed,
    #[error("backend rejected call: {0}")]
    Rejected(String),
}

/// Callable surface exposed by the backend process
pub trait Backend: Send + Sync {
    /// Forward raw keystroke text to the remote process
    fn write_data(&self, text: &str) -> Result<(), ChannelError>;

    /// Inform the remote PTY of a new viewport geometry
    fn set_pty_size(&self, message: &str) -> Result<(), ChannelError>;
}

/// Lazily-available reference to the backend
#[derive(Clone, Default)]
pub struct ChannelHandle {
    slot: Arc<OnceLock<Arc<dyn Backend>>>,
}

impl ChannelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the backend. The first call wins; later calls are ignored.
    pub fn mark_ready(&self, backend: Arc<dyn Backend>) -> bool {
        let installed = self.slot.set(backend).is_ok();
        if installed {
            info!("backend channel ready");
        } else {
            debug!("backend channel already ready, ignoring");
        }
        installed
    }

    pub fn is_ready(&self) -> bool {
        self.slot.get().is_some()
    }

    fn backend(&self) -> Result<&Arc<dyn Backend>, ChannelError> {
        self.slot.get().ok_or(ChannelError::NotReady)
    }

    pub fn write_data(&self, text: &str) -> Result<(), ChannelError> {
        self.backend()?.write_data(text)
    }

    pub fn set_pty_size(&self, message: &str) -> Result<(), ChannelError> {
        self.backend()?.set_pty_size(message)
    }
}

/// Run the channel handshake in the background.
///
/// The handle becomes ready when `connect` resolves to a backend. A failed
/// handshake is logged and leaves the handle unset.
pub fn handshake<F, E>(handle: ChannelHandle, connect: F) -> tokio::task::JoinHandle<()>
where
    F: Future<Output = Result<Arc<dyn Backend>, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    tokio::spawn(async move {
        match connect.await {
            Ok(backend) => {
                handle.mark_ready(backend);
            }
            Err(e) => warn!("channel handshake failed: {}", e),
        }
    })
}

/// Raw call forwarded by `ChannelBackend`
#[derive(Debug, Clone, PartialEq, Eq)]
enum BackendCall {
    Data(String),
    PtySize(String),
}

/// Request as seen by the backend side of an in-process channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRequest {
    Input(String),
    Resize(Geometry),
}

/// Front-end half of an in-process channel
pub struct ChannelBackend {
    tx: mpsc::UnboundedSender<BackendCall>,
}

impl Backend for ChannelBackend {
    fn write_data(&self, text: &str) -> Result<(), ChannelError> {
        self.tx
            .send(BackendCall::Data(text.to_string()))
            .map_err(|_| ChannelError::Closed)
    }

    fn set_pty_size(&self, message: &str) -> Result<(), ChannelError> {
        self.tx
            .send(BackendCall::PtySize(message.to_string()))
            .map_err(|_| ChannelError::Closed)
    }
}

/// Backend half of an in-process channel
pub struct RemoteEnd {
    rx: mpsc::UnboundedReceiver<BackendCall>,
}

impl RemoteEnd {
    /// Next request from the front end, `None` once the front end is gone.
    ///
    /// Resize messages are decoded here; a malformed one surfaces as an error
    /// for that message only.
    pub async fn recv(&mut self) -> Option<Result<RemoteRequest, GeometryError>> {
        let call = self.rx.recv().await?;
        Some(Self::decode(call))
    }

    /// Non-blocking variant of `recv`
    pub fn try_recv(&mut self) -> Option<Result<RemoteRequest, GeometryError>> {
        self.rx.try_recv().ok().map(Self::decode)
    }

    fn decode(call: BackendCall) -> Result<RemoteRequest, GeometryError> {
        match call {
            BackendCall::Data(text) => Ok(RemoteRequest::Input(text)),
            BackendCall::PtySize(msg) => ResizeMessage::decode(&msg).map(RemoteRequest::Resize),
        }
    }
}

/// Create a connected in-process channel
pub fn pair() -> (ChannelBackend, RemoteEnd) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelBackend { tx }, RemoteEnd { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl Backend for Recorder {
        fn write_data(&self, text: &str) -> Result<(), ChannelError> {
            self.calls.lock().unwrap().push(format!("data:{text}"));
            Ok(())
        }

        fn set_pty_size(&self, message: &str) -> Result<(), ChannelError> {
            self.calls.lock().unwrap().push(format!("size:{message}"));
            Ok(())
        }
    }

    #[test]
    fn unset_handle_reports_not_ready() {
        let handle = ChannelHandle::new();
        assert!(!handle.is_ready());
        assert_eq!(handle.write_data("ls\r"), Err(ChannelError::NotReady));
        assert_eq!(
            handle.set_pty_size("cols:80::rows:24"),
            Err(ChannelError::NotReady)
        );
    }

    #[test]
    fn clones_share_readiness() {
        let handle = ChannelHandle::new();
        let clone = handle.clone();
        let recorder = Arc::new(Recorder::default());
        assert!(handle.mark_ready(recorder.clone()));

        assert!(clone.is_ready());
        clone.write_data("a").unwrap();
        clone.set_pty_size("cols:1::rows:1").unwrap();
        assert_eq!(
            *recorder.calls.lock().unwrap(),
            vec!["data:a".to_string(), "size:cols:1::rows:1".to_string()]
        );
    }

    #[test]
    fn first_backend_wins() {
        let handle = ChannelHandle::new();
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        assert!(handle.mark_ready(first.clone()));
        assert!(!handle.mark_ready(second.clone()));

        handle.write_data("x").unwrap();
        assert_eq!(first.calls.lock().unwrap().len(), 1);
        assert!(second.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn pair_decodes_requests() {
        let (backend, mut remote) = pair();
        backend.write_data("echo hi\r").unwrap();
        backend.set_pty_size("cols:120::rows:40").unwrap();
        backend.set_pty_size("nonsense").unwrap();

        assert_eq!(
            remote.try_recv(),
            Some(Ok(RemoteRequest::Input("echo hi\r".to_string())))
        );
        assert_eq!(
            remote.try_recv(),
            Some(Ok(RemoteRequest::Resize(Geometry::new(120, 40))))
        );
        assert!(matches!(remote.try_recv(), Some(Err(_))));
        assert_eq!(remote.try_recv(), None);
    }

    #[test]
    fn dropped_remote_closes_channel() {
        let (backend, remote) = pair();
        drop(remote);
        assert_eq!(backend.write_data("x"), Err(ChannelError::Closed));
    }

    #[tokio::test]
    async fn handshake_marks_ready() {
        let handle = ChannelHandle::new();
        let (backend, mut remote) = pair();
        let backend: Arc<dyn Backend> = Arc::new(backend);

        handshake(handle.clone(), async move { Ok::<_, String>(backend) })
            .await
            .unwrap();

        assert!(handle.is_ready());
        handle.write_data("pwd\r").unwrap();
        assert_eq!(
            remote.recv().await,
            Some(Ok(RemoteRequest::Input("pwd\r".to_string())))
        );
    }

    #[tokio::test]
    async fn failed_handshake_leaves_handle_unset() {
        let handle = ChannelHandle::new();
        handshake(handle.clone(), async {
            Err::<Arc<dyn Backend>, _>("transport unavailable")
        })
        .await
        .unwrap();

        assert!(!handle.is_ready());
    }
}
