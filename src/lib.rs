//! termbridge - terminal widget <-> remote shell bridge
//!
//! Relays keystrokes and output between a terminal-emulator widget and a
//! backend channel, keeps the remote PTY's geometry in step with the
//! visible viewport, and applies colour themes at runtime.

pub mod app;
pub mod bridge;
pub mod channel;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod page;
pub mod session;
pub mod theme;
pub mod viewport;
pub mod widget;

pub use app::{PageEvent, PageHandle, TerminalPage};
pub use channel::{Backend, ChannelError, ChannelHandle};
pub use config::BridgeConfig;
pub use geometry::{Geometry, WireFormat};
pub use theme::{ThemeCatalog, ThemeDescriptor, ThemeManager};
