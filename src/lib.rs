//! tileview - tiled document viewport for the web
//!
//! Composites pre-rendered square tiles of a document onto a Canvas 2D
//! surface via WebAssembly:
//! - Split panes for frozen spreadsheet rows and columns
//! - Page backgrounds and page-number labels for file-based documents
//! - Zoom transitions drawn from the best available tile level
//! - Scroll bars with drag, quick scroll, auto scroll and kinetic wheel scrolling
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TileView } from 'tileview';
//! await init();
//! const view = new TileView(canvas, devicePixelRatio);
//! view.set_document_size(12000, 48000);
//! view.add_tile(0, 0, 10, 0, 0, tileCanvas);
//! view.render();
//! ```

pub mod error;
pub mod layout;
pub mod render;
pub mod replay;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{Result, TileviewError};
pub use layout::{DocType, PaintContext, Platform, ViewportConfig, ZoomFrame};
pub use render::{Canvas, FrameOutcome, MemoryTileStore, PainterOptions, TilePainter, TileStore};
pub use types::*;
#[cfg(target_arch = "wasm32")]
pub use viewer::TileView;
pub use viewer::{Container, ScrollEngine, ScrollOptions, ViewportSession};

/// Check a serialized `ViewportConfig` and return it with defaults filled in.
///
/// # Errors
/// Returns an error if the value does not deserialize or fails validation.
#[wasm_bindgen]
pub fn normalize_config(config: JsValue) -> std::result::Result<JsValue, JsValue> {
    let config: ViewportConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;
    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&config)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
