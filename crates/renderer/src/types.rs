/// Window title used when the caller does not supply one.
pub const DEFAULT_TITLE: &str = "Heat Map Vis App";
/// Window size in physical pixels used when the caller does not supply one.
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (800, 800);

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors the window-related CLI flags; everything about the
/// field itself travels separately as a `ScalarField`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub window_size: (u32, u32),
    /// Title shown by the window manager.
    pub title: String,
}

impl Default for RendererConfig {
    /// An 800x800 window titled "Heat Map Vis App".
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}
