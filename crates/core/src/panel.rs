/// What the visualization area currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelDisplay {
    /// Default empty/selection state, nothing loaded.
    #[default]
    Placeholder,
    /// An embedded demo loaded from `path`.
    Frame { path: String, title: String },
}

/// State of the side panel hosting visualizations.
///
/// Two independent flags: whether the side panel is open at all, and, on compact
/// layouts, whether the viewer is shown over the item list. Neither changes
/// what is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizationPanel {
    open: bool,
    display: PanelDisplay,
    compact_showing: bool,
}

impl Default for VisualizationPanel {
    fn default() -> Self {
        Self {
            open: true,
            display: PanelDisplay::Placeholder,
            compact_showing: false,
        }
    }
}

impl VisualizationPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn display(&self) -> &PanelDisplay {
        &self.display
    }

    #[must_use]
    pub fn loaded_path(&self) -> Option<&str> {
        match &self.display {
            PanelDisplay::Frame { path, .. } => Some(path),
            PanelDisplay::Placeholder => None,
        }
    }

    #[must_use]
    pub fn compact_showing(&self) -> bool {
        self.compact_showing
    }

    /// Loads `path` and reveals the viewer, opening the panel if needed.
    pub fn show(&mut self, path: impl Into<String>, title: impl Into<String>) {
        self.open = true;
        self.display = PanelDisplay::Frame {
            path: path.into(),
            title: title.into(),
        };
    }

    /// Reveals the default state and unloads any reference.
    pub fn show_placeholder(&mut self) {
        self.display = PanelDisplay::Placeholder;
    }

    pub fn toggle_open(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Flips the compact-layout viewer flag.
    ///
    /// Only items with a visualization can be flipped; otherwise the flag stays put.
    pub fn toggle_compact(&mut self, current_has_viz: bool) -> bool {
        if current_has_viz {
            self.compact_showing = !self.compact_showing;
        }
        self.compact_showing
    }

    /// Called whenever the active item changes.
    pub fn reset_compact(&mut self) {
        self.compact_showing = false;
    }
}
