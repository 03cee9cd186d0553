//! Reading a chapter: opening it, moving through items, crediting dwell time.

pub mod dwell;
mod intent;
mod service;
mod session;
mod view;

pub use dwell::{DEFAULT_DWELL, DwellEvents, DwellTimer};
pub use intent::ReaderIntent;
pub use service::{ReaderService, ReaderSettings};
pub use session::ReaderSession;
pub use view::{ItemView, PanelView, ReaderSnapshot};
