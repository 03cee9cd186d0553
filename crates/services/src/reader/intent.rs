/// User-facing reader commands that apply without suspending.
///
/// Resetting progress is not here: it writes to storage and needs confirmation
/// first, so it goes through `ReaderSession::reset` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderIntent {
    Next,
    Prev,
    Activate(usize),
    TogglePanel,
    ClosePanel,
    ToggleCompact,
    OpenVisualization(usize),
}

impl ReaderIntent {
    /// Maps a keyboard key name to a navigation intent.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" | "ArrowRight" => Some(Self::Next),
            "ArrowUp" | "ArrowLeft" => Some(Self::Prev),
            _ => None,
        }
    }
}
