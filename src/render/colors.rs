//! Colors for tile compositing, page backgrounds, scroll bars and the debug
//! overlay, as CSS strings usable directly by Canvas 2D.

/// A CSS color string (e.g., "#FF0000", "rgba(255, 0, 0, 0.5)")
pub type CssColor = String;

/// Colors used by the painter and the scroll bars (CSS format)
pub mod palette {
    pub const WHITE: &str = "#FFFFFF";
    pub const BLACK: &str = "black";

    /// Page number text in file-based view.
    pub const PAGE_TEXT: &str = "grey";

    /// Page outline in file-based and multi-page views.
    pub const PAGE_BORDER: &str = "lightgrey";

    /// Scroll bar track ("railway").
    pub const SCROLLBAR_RAILWAY: &str = "#EFEFEF";

    /// Scroll bar thumb.
    pub const SCROLLBAR_THUMB: &str = "#7E8182";

    // Debug overlay
    pub const DEBUG_TILE_BORDER: &str = "rgba(0, 0, 255, 0.8)";
    pub const DEBUG_NO_CONTENT: &str = "rgba(255, 0, 0, 0.8)";
    pub const DEBUG_NEEDS_FETCH: &str = "rgba(255, 255, 0, 0.8)";
    pub const DEBUG_READY: &str = "rgba(0, 255, 0, 0.5)";
    pub const DEBUG_DELTAS: &str = "rgba(0, 0, 256, 0.3)";
    pub const DEBUG_UPDATES: &str = "rgba(256, 256, 0, 0.3)";
    pub const DEBUG_TEXT_BACKGROUND: &str = "rgba(220, 220, 220, 0.5)";
    pub const CHECKERBOARD_DARK: &str = "darkgray";
    pub const CHECKERBOARD_LIGHT: &str = "gray";
}

